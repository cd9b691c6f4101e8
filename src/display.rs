//! The detector plot context.
//!
//! [`DetPlot`] ties an event source to the branch configuration, loads and
//! caches per-event collections, and assembles the traces the viewer draws.

use std::collections::{HashMap, VecDeque};

use crate::collection::{Collection, CollectionKind};
use crate::config::{DisplayConfig, McSettings, SubdetectorConfig};
use crate::error::{ConfigError, DisplayError};
use crate::pdg::PdgVisMap;
use crate::store::{EventReader, EventSource};
use crate::tracks::{plot_mc_tracks, HitMarkers, Trace};

/// Event-loading and trace-assembly context for one display session.
///
/// # Example
///
/// ```ignore
/// let mut plot = DetPlot::new(Edm4hepJsonFile::new("events.json"), subdetectors,
///                             McSettings::default(), None, pdg_map);
/// plot.load_hits_for_event(0)?;
/// plot.print_sizes_for_event(0);
/// let traces = plot.hitmarkers_for_event(0);
/// ```
pub struct DetPlot<S: EventSource> {
    source: S,
    subdetectors: Vec<SubdetectorConfig>,
    mc_settings: McSettings,
    max_mc: Option<usize>,
    pdg_map: PdgVisMap,
    collections: HashMap<String, HashMap<usize, Collection>>,
    /// Cached events, oldest load first.
    load_order: VecDeque<usize>,
    cache_limit: Option<usize>,
}

impl<S: EventSource> DetPlot<S> {
    pub fn new(
        source: S,
        subdetectors: Vec<SubdetectorConfig>,
        mc_settings: McSettings,
        max_mc: Option<usize>,
        pdg_map: PdgVisMap,
    ) -> Self {
        Self {
            source,
            subdetectors,
            mc_settings,
            max_mc,
            pdg_map,
            collections: HashMap::new(),
            load_order: VecDeque::new(),
            cache_limit: None,
        }
    }

    /// Build from a display configuration.
    pub fn from_config(
        source: S,
        config: &DisplayConfig,
        pdg_map: PdgVisMap,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::new(
            source,
            config.subdetectors.clone(),
            config.mc_settings.clone(),
            config.max_mc_limit()?,
            pdg_map,
        ))
    }

    /// Keep at most `events` events cached, dropping the least recently
    /// loaded one when a new event is loaded.
    pub fn with_cache_limit(mut self, events: usize) -> Self {
        self.cache_limit = Some(events.max(1));
        self
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn subdetectors(&self) -> &[SubdetectorConfig] {
        &self.subdetectors
    }

    pub fn mc_settings(&self) -> &McSettings {
        &self.mc_settings
    }

    pub fn pdg_map(&self) -> &PdgVisMap {
        &self.pdg_map
    }

    fn subdetector(&self, branch: &str) -> Option<&SubdetectorConfig> {
        self.subdetectors.iter().find(|s| s.branch == branch)
    }

    /// Number of events in the store.
    pub fn num_events(&self) -> Result<usize, DisplayError> {
        Ok(self.source.open()?.num_entries())
    }

    /// Event numbers present in the store, ascending.
    pub fn event_numbers(&self) -> Result<Vec<usize>, DisplayError> {
        Ok(self.source.open()?.entries())
    }

    /// Load every configured branch of `event` into the cache.
    ///
    /// The store is opened for this call only. A branch loaded before for the
    /// same event is replaced.
    pub fn load_hits_for_event(&mut self, event: usize) -> Result<(), DisplayError> {
        let reader = self.source.open()?;
        let branches = reader.branch_names(event)?;

        let mut loaded = Vec::new();
        for branch in &branches {
            let Some(sub) = self.subdetector(branch) else {
                continue;
            };
            let limit = match sub.kind {
                CollectionKind::MCParticle => self.max_mc,
                _ => None,
            };
            match sub.kind.load(&reader, event, branch, limit)? {
                Some(collection) => loaded.push((branch.clone(), collection)),
                None => log::debug!(
                    "Skipping branch '{}' with unsupported type '{}'",
                    branch,
                    sub.kind
                ),
            }
        }

        self.make_room_for(event);
        for (branch, collection) in loaded {
            log::debug!("Event {}: {} holds {} entries", event, branch, collection.len());
            self.collections
                .entry(branch)
                .or_default()
                .insert(event, collection);
        }
        self.load_order.retain(|&e| e != event);
        self.load_order.push_back(event);

        log::info!("Loaded event {}", event);
        Ok(())
    }

    fn make_room_for(&mut self, event: usize) {
        let Some(limit) = self.cache_limit else {
            return;
        };
        if self.load_order.contains(&event) {
            return;
        }
        while self.load_order.len() >= limit {
            let Some(oldest) = self.load_order.pop_front() else {
                break;
            };
            log::debug!("Evicting event {} from the cache", oldest);
            for events in self.collections.values_mut() {
                events.remove(&oldest);
            }
        }
        self.collections.retain(|_, events| !events.is_empty());
    }

    /// The cached collection of `branch` for `event`.
    pub fn get_hits_for_event(&self, event: usize, branch: &str) -> Result<&Collection, DisplayError> {
        self.collections
            .get(branch)
            .and_then(|events| events.get(&event))
            .ok_or_else(|| DisplayError::NotLoaded {
                branch: branch.to_string(),
                event,
            })
    }

    pub fn is_loaded(&self, event: usize) -> bool {
        self.load_order.contains(&event)
    }

    /// Cached event indices, oldest load first.
    pub fn loaded_events(&self) -> Vec<usize> {
        self.load_order.iter().copied().collect()
    }

    pub fn clear_cache(&mut self) {
        self.collections.clear();
        self.load_order.clear();
    }

    /// Traces for `event`, walking the configured branches in order.
    ///
    /// The MC particle branch yields one entry per selected track. Every other
    /// branch yields one marker set. A branch that was not loaded for `event`
    /// yields a single `None`.
    pub fn hitmarkers_for_event(&self, event: usize) -> Vec<Option<Trace>> {
        let mut traces = Vec::new();

        for sub in &self.subdetectors {
            let collection = self.get_hits_for_event(event, &sub.branch).ok();
            match (&sub.kind, collection) {
                (_, None) => traces.push(None),
                (CollectionKind::MCParticle, Some(collection)) => {
                    if let Some(particles) = collection.as_mc() {
                        traces.extend(
                            plot_mc_tracks(particles, &self.mc_settings, &self.pdg_map)
                                .into_iter()
                                .map(|track| Some(Trace::Track(track))),
                        );
                    }
                }
                (_, Some(collection)) => {
                    traces.push(HitMarkers::from_collection(collection, sub).map(Trace::Markers));
                }
            }
        }

        traces
    }

    /// `(branch, entries)` for every branch loaded for `event`, by branch name.
    pub fn sizes_for_event(&self, event: usize) -> Vec<(&str, usize)> {
        let mut sizes: Vec<(&str, usize)> = self
            .collections
            .iter()
            .filter_map(|(branch, events)| events.get(&event).map(|c| (branch.as_str(), c.len())))
            .collect();
        sizes.sort_by(|a, b| a.0.cmp(b.0));
        sizes
    }

    /// Console table of collection sizes for `event`.
    pub fn size_summary(&self, event: usize) -> String {
        let mut out = format!("{:<40} {:<10}\n", "Subdetector Collection", "Hits");
        out.push_str(&"-".repeat(50));
        out.push('\n');
        for (branch, n) in self.sizes_for_event(event) {
            out.push_str(&format!("{:<40} {:<10}\n", branch, n));
        }
        out
    }

    pub fn print_sizes_for_event(&self, event: usize) {
        print!("{}", self.size_summary(event));
    }
}
