//! Demo tools.
//!
//! Each tool is a thin adapter between the argument bag and a backend trait,
//! so the backends can be swapped without touching the protocol surface.

pub mod calculator;
pub mod chat;
pub mod weather;

pub use calculator::{CalculatorTool, Evaluator, PlaceholderEvaluator};
pub use chat::{Availability, ChatTool, LanguageModel, ModelError, NoModel};
pub use weather::{FixedWeather, WeatherReading, WeatherSource, WeatherTool};
