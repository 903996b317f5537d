//! Configuration model and the message type it operates on

pub mod message;
pub mod output_mode;
pub mod processor_config;
pub mod resource;

pub use message::Message;
pub use output_mode::OutputMode;
pub use processor_config::{relaxed_form, ProcessorConfig, SettingKey, SETTINGS_PREFIX};
pub use resource::{ResourceHandle, ResourceLocation};
