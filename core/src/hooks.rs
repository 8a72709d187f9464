//! Context-sensitive phonological adjustments applied around mapping.

use std::fmt;
use std::sync::Arc;

use crate::dialect::DialectConfig;
use crate::entity::Entity;

/// A phonological rule over an entity sequence.
///
/// `adjust` returns the replacement for the entity at `position`: usually one
/// entity, possibly none or several. It must be pure and total over
/// well-formed sequences; the driver always passes the unmodified sequence so
/// every position sees its original neighbors.
pub trait PhonologicalHook: Send + Sync {
    fn name(&self) -> &str;

    fn adjust(&self, sequence: &[Entity], position: usize) -> Vec<Entity>;
}

/// Hook backed by a plain function.
#[derive(Clone, Copy)]
pub struct FnHook {
    name: &'static str,
    rule: fn(&[Entity], usize) -> Vec<Entity>,
}

impl FnHook {
    pub const fn new(name: &'static str, rule: fn(&[Entity], usize) -> Vec<Entity>) -> Self {
        Self { name, rule }
    }
}

impl fmt::Debug for FnHook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("FnHook").field(&self.name).finish()
    }
}

impl PhonologicalHook for FnHook {
    fn name(&self) -> &str {
        self.name
    }

    fn adjust(&self, sequence: &[Entity], position: usize) -> Vec<Entity> {
        (self.rule)(sequence, position)
    }
}

/// Runs `hook` over every position of `sequence`.
pub fn apply_hook(hook: &dyn PhonologicalHook, sequence: &[Entity]) -> Vec<Entity> {
    (0..sequence.len()).flat_map(|i| hook.adjust(sequence, i)).collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookStage {
    /// Over source entities, before mapping.
    BeforeMapping,
    /// Over target entities, after mapping.
    AfterMapping,
}

/// A hook attached to a mapper, optionally gated on target-dialect options.
#[derive(Clone)]
pub struct HookBinding {
    pub stage: HookStage,
    /// `(option, value)` pairs that must all hold in the target dialect.
    pub when: Vec<(String, String)>,
    pub hook: Arc<dyn PhonologicalHook>,
}

impl HookBinding {
    pub fn new(stage: HookStage, hook: Arc<dyn PhonologicalHook>) -> Self {
        Self {
            stage,
            when: Vec::new(),
            hook,
        }
    }

    pub fn when(mut self, option: &str, value: &str) -> Self {
        self.when.push((option.to_owned(), value.to_owned()));
        self
    }

    pub fn is_active(&self, target: &DialectConfig) -> bool {
        self.when.iter().all(|(option, value)| target.text(option) == value)
    }
}

impl fmt::Debug for HookBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HookBinding")
            .field("stage", &self.stage)
            .field("when", &self.when)
            .field("hook", &self.hook.name())
            .finish()
    }
}
