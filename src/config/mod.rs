//! Configuration module for datamodel.
//!
//! Handles the settings file and environment variable expansion.

mod settings;

pub use settings::{
    expand_env_vars, OperationSettings, OutputSettings, PolymorphismSettings, Settings,
    SettingsError,
};
