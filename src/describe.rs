//! Fallback description generation for destinations created without one.
//!
//! Stands in for an external text-generation service behind the same
//! one-call surface; swapping in a real client only touches this module.

pub struct DescriptionGenerator;

impl DescriptionGenerator {
    pub fn new() -> Self {
        Self
    }

    pub fn generate(&self, name: &str) -> String {
        format!(
            "{name} rewards the curious traveler with striking scenery, \
             welcoming locals, and food worth the trip on its own."
        )
    }
}

impl Default for DescriptionGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_description_mentions_the_destination() {
        let text = DescriptionGenerator::new().generate("Lisbon");
        assert!(text.starts_with("Lisbon"));
        assert!(!text.is_empty());
    }
}
