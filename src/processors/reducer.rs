use crate::models::StationMap;

/// Folds worker-local station maps into one global map.
#[derive(Debug, Default)]
pub struct Reducer {
    stations: StationMap,
    partials: usize,
}

impl Reducer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge one worker's map. Keys are moved, never cloned.
    pub fn absorb(&mut self, partial: StationMap) {
        for (station, aggregate) in partial {
            self.stations
                .entry(station)
                .and_modify(|existing| existing.merge(&aggregate))
                .or_insert(aggregate);
        }
        self.partials += 1;
    }

    pub fn partials(&self) -> usize {
        self.partials
    }

    pub fn finish(self) -> StationMap {
        self.stations
    }

    /// Merge every partial map, in whatever order they are supplied.
    pub fn reduce<I>(partials: I) -> StationMap
    where
        I: IntoIterator<Item = StationMap>,
    {
        let mut reducer = Self::new();
        for partial in partials {
            reducer.absorb(partial);
        }
        reducer.finish()
    }
}
