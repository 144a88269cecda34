pub mod cme;
pub mod donki;
pub mod fetch_gateway;
pub mod normalizer;
pub mod poller;
pub mod simulated;
pub mod solar_processor;
pub mod space_weather;
