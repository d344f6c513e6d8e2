pub mod advanced;
pub mod mashup;

#[cfg(test)]
pub(crate) mod testing;

pub use advanced::AdvancedMashup;
pub use mashup::BasicMashup;
