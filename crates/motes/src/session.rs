//! Environment catalog and the active particle system.

use crate::environment::initializers::InitializerRegistry;
use crate::environment::{presets, EnvironmentConfig, ValidatedEnvironment};
use crate::error::SessionError;
use crate::rng::SeededRandom;
use crate::system::ParticleSystem;
use glam::Vec3;
use log::{info, warn};
use std::collections::HashMap;

/// Owns the session RNG, the initializer registry, every loaded environment
/// and at most one running [`ParticleSystem`].
pub struct Session {
    rng: SeededRandom,
    registry: InitializerRegistry,
    environments: HashMap<String, ValidatedEnvironment>,
    current: Option<ActiveEnvironment>,
}

struct ActiveEnvironment {
    id: String,
    system: ParticleSystem,
}

impl Session {
    /// Session with the built-in initializers and a fixed seed.
    pub fn new(seed: u32) -> Self {
        Self::with_registry(SeededRandom::new(seed), InitializerRegistry::with_builtins())
    }

    pub fn with_registry(rng: SeededRandom, registry: InitializerRegistry) -> Self {
        info!("Session created (seed {})", rng.seed());
        Self {
            rng,
            registry,
            environments: HashMap::new(),
            current: None,
        }
    }

    /// Validate a built-in preset and add it to the catalog.
    pub fn load_preset(&mut self, id: &str) -> Result<&ValidatedEnvironment, SessionError> {
        let config =
            presets::preset(id).ok_or_else(|| SessionError::UnknownEnvironment(id.to_string()))?;
        self.register(config)
    }

    /// Validate an external config and add it to the catalog, replacing any
    /// inactive environment with the same id. The active id is refused.
    /// Nothing is stored on error.
    pub fn register(&mut self, config: EnvironmentConfig) -> Result<&ValidatedEnvironment, SessionError> {
        if self.current_id() == Some(config.id.as_str()) {
            warn!("Refusing to replace running environment '{}'", config.id);
            return Err(SessionError::EnvironmentActive(config.id));
        }
        let environment = config.validate(&self.registry)?;
        let id = environment.id().to_string();
        info!("Environment loaded: {} ({})", id, environment.config().name);
        self.environments.insert(id.clone(), environment);
        self.environments
            .get(&id)
            .ok_or(SessionError::UnknownEnvironment(id))
    }

    /// Make `id` the active environment, loading it as a preset if it is
    /// not in the catalog yet.
    ///
    /// The new system is fully built before the old one is dropped, so on
    /// error the previous environment keeps running.
    pub fn switch_environment(&mut self, id: &str) -> Result<(), SessionError> {
        self.switch_environment_with_mode(id, None)
    }

    /// Like [`Self::switch_environment`], but when `mode` is given the
    /// system runs that behavior tag instead of the config's own. Unknown
    /// tags fall back to flocking with a warning.
    pub fn switch_environment_with_mode(
        &mut self,
        id: &str,
        mode: Option<&str>,
    ) -> Result<(), SessionError> {
        if !self.environments.contains_key(id) {
            if let Err(err) = self.load_preset(id) {
                warn!("Switch to '{}' failed: {}", id, err);
                return Err(err);
            }
        }
        let environment = self
            .environments
            .get(id)
            .ok_or_else(|| SessionError::UnknownEnvironment(id.to_string()))?;

        let system = match mode {
            Some(tag) => ParticleSystem::with_mode(
                environment,
                tag,
                Some(environment.config().behavior.clone()),
                &mut self.rng,
            ),
            None => ParticleSystem::new(environment, &mut self.rng),
        };
        if let Some(previous) = self.current.take() {
            info!("Particle system for '{}' dropped", previous.id);
        }
        info!("Switched to environment: {} ({})", id, environment.config().name);
        self.current = Some(ActiveEnvironment {
            id: id.to_string(),
            system,
        });
        Ok(())
    }

    /// Advance the active system, if any.
    pub fn update(&mut self, delta: f32, interaction: Option<Vec3>) {
        if let Some(active) = self.current.as_mut() {
            active.system.update(delta, interaction);
        }
    }

    pub fn current_environment(&self) -> Option<&ValidatedEnvironment> {
        let active = self.current.as_ref()?;
        self.environments.get(&active.id)
    }

    pub fn current_id(&self) -> Option<&str> {
        self.current.as_ref().map(|active| active.id.as_str())
    }

    pub fn system(&self) -> Option<&ParticleSystem> {
        self.current.as_ref().map(|active| &active.system)
    }

    pub fn system_mut(&mut self) -> Option<&mut ParticleSystem> {
        self.current.as_mut().map(|active| &mut active.system)
    }

    pub fn environment(&self, id: &str) -> Option<&ValidatedEnvironment> {
        self.environments.get(id)
    }

    /// Ids in the catalog, sorted.
    pub fn environment_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.environments.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    pub fn registry(&self) -> &InitializerRegistry {
        &self.registry
    }

    /// Register custom initializers here before loading configs that use them.
    pub fn registry_mut(&mut self) -> &mut InitializerRegistry {
        &mut self.registry
    }

    /// Drop the active system and forget every loaded environment.
    pub fn dispose(&mut self) {
        self.current = None;
        self.environments.clear();
        info!("Session disposed");
    }
}
