//! Configuration module

mod site;

pub use site::RobotsConfig;
pub use site::SiteConfig;
