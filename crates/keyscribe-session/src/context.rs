use keyscribe_core::combo::{ComboAction, ComboConfig, ComboError, ComboRegistry, KeyPattern};
use keyscribe_core::composer::{ComposeError, Composer};
use keyscribe_core::keymap::VirtualKey;
use keyscribe_core::settings::Settings;

use crate::classifier::Classifier;
use crate::ignore::{IgnoreSequenceError, IgnoreSequenceRegistry};
use crate::listeners::{
    EventSink, ForegroundCallback, KeypressListener, ListenerRegistry, TrackingCallback,
};

/// Everything the engine consults but does not own per phrase: settings,
/// combo and ignore registries, listeners and hotkey callbacks.
///
/// `EngineContext::default()` gives a fresh context from the process-wide
/// settings with no listeners and no ignore sequences.
pub struct EngineContext {
    settings: Settings,
    combos: ComboRegistry,
    composer: Composer,
    classifier: Classifier,
    ignore_sequences: IgnoreSequenceRegistry,
    keypress_listeners: ListenerRegistry<dyn KeypressListener>,
    event_sinks: ListenerRegistry<dyn EventSink>,
    foreground_callback: Option<ForegroundCallback>,
    tracking_callback: Option<TrackingCallback>,
}

impl EngineContext {
    pub fn new(settings: Settings) -> Result<Self, ComboError> {
        let combos = settings.combo_registry()?;
        let classifier = Classifier::new(settings.classifier.machine_threshold_ms);
        Ok(Self {
            settings,
            combos,
            composer: Composer::standard(),
            classifier,
            ignore_sequences: IgnoreSequenceRegistry::new(),
            keypress_listeners: ListenerRegistry::default(),
            event_sinks: ListenerRegistry::default(),
            foreground_callback: None,
            tracking_callback: None,
        })
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn combos(&self) -> &ComboRegistry {
        &self.combos
    }

    pub fn composer(&self) -> &Composer {
        &self.composer
    }

    pub fn classifier(&self) -> &Classifier {
        &self.classifier
    }

    pub fn ignore_sequences(&self) -> &IgnoreSequenceRegistry {
        &self.ignore_sequences
    }

    pub fn keypress_listeners(&self) -> &ListenerRegistry<dyn KeypressListener> {
        &self.keypress_listeners
    }

    pub fn event_sinks(&self) -> &ListenerRegistry<dyn EventSink> {
        &self.event_sinks
    }

    pub fn register_combo(
        &mut self,
        action: ComboAction,
        keys: Vec<KeyPattern>,
    ) -> Result<(), ComboError> {
        self.combos.register(ComboConfig::new(action, keys)?)
    }

    pub fn register_multi_key_char(
        &mut self,
        keys: Vec<KeyPattern>,
        ch: char,
    ) -> Result<(), ComposeError> {
        self.composer.register(keys, ch)
    }

    pub fn register_ignore_sequence(
        &mut self,
        keys: Vec<VirtualKey>,
        ignore_from: usize,
    ) -> Result<(), IgnoreSequenceError> {
        self.ignore_sequences.register(keys, ignore_from)
    }

    pub fn unregister_ignore_sequence(
        &mut self,
        keys: &[VirtualKey],
    ) -> Result<(), IgnoreSequenceError> {
        self.ignore_sequences.unregister(keys)
    }

    pub fn set_foreground_callback(&mut self, callback: Option<ForegroundCallback>) {
        self.foreground_callback = callback;
    }

    pub fn set_tracking_callback(&mut self, callback: Option<TrackingCallback>) {
        self.tracking_callback = callback;
    }

    pub(crate) fn foreground_callback(&self) -> Option<&ForegroundCallback> {
        self.foreground_callback.as_ref()
    }

    pub(crate) fn tracking_callback(&self) -> Option<&TrackingCallback> {
        self.tracking_callback.as_ref()
    }
}

impl Default for EngineContext {
    fn default() -> Self {
        Self::new(Settings::default()).expect("validated settings build a combo registry")
    }
}

impl std::fmt::Debug for EngineContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EngineContext")
            .field("combos", &self.combos.len())
            .field("ignore_sequences", &self.ignore_sequences.len())
            .field("keypress_listeners", &self.keypress_listeners.len())
            .field("event_sinks", &self.event_sinks.len())
            .finish_non_exhaustive()
    }
}
