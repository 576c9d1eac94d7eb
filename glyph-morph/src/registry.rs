use std::collections::HashMap;

use rand::RngCore;

use crate::error::{MorphError, MorphResult};
use crate::grid::Grid;
use crate::morph::Frame;
use crate::scroll;
use crate::styles;

pub const MAX_SLOTS: usize = 3;

pub type TransformFn = fn(&Frame<'_>, &mut dyn RngCore) -> Grid;

/// A named transform plus the labels of the curve slots it reads.
#[derive(Debug, Clone)]
pub struct Style {
    name: String,
    slots: Vec<String>,
    transform: TransformFn,
}

impl Style {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of curve slots this style reads.
    pub fn arity(&self) -> usize {
        self.slots.len()
    }

    pub fn slot_names(&self) -> impl Iterator<Item = &str> {
        self.slots.iter().map(String::as_str)
    }

    pub fn apply(&self, frame: &Frame<'_>, rng: &mut dyn RngCore) -> Grid {
        (self.transform)(frame, rng)
    }
}

/// Styles in registration order. Re-registering a name replaces it in place.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    styles: Vec<Style>,
    index: HashMap<String, usize>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flicker, cover, cover-with-border and scroll, in that order.
    pub fn builtin() -> Self {
        let mut registry = Self::new();

        registry.insert(
            styles::FLICKER,
            styles::flicker,
            &["Movement Mapping", "Probability Mapping"],
        );
        registry.insert(styles::COVER, styles::cover, &["Edge Mapping"]);
        registry.insert(styles::COVER_WITH_BORDER, styles::cover_with_border, &["Edge Mapping"]);
        registry.insert(
            styles::SCROLL,
            scroll::scroll,
            &["Start Edge", "End Edge", "Edge Mapping"],
        );

        registry
    }

    pub fn register(
        &mut self,
        name: impl Into<String>,
        transform: TransformFn,
        slots: &[&str],
    ) -> MorphResult<()> {
        let name = name.into();

        if slots.len() > MAX_SLOTS {
            return Err(MorphError::TooManySlots {
                name,
                count: slots.len(),
            });
        }

        self.insert(name, transform, slots);

        Ok(())
    }

    fn insert(&mut self, name: impl Into<String>, transform: TransformFn, slots: &[&str]) {
        let style = Style {
            name: name.into(),
            slots: slots.iter().map(|s| s.to_string()).collect(),
            transform,
        };

        match self.index.get(&style.name).copied() {
            Some(i) => {
                tracing::debug!(name = %style.name, "replacing style");
                self.styles[i] = style;
            }
            None => {
                tracing::debug!(name = %style.name, arity = style.arity(), "registering style");
                self.index.insert(style.name.clone(), self.styles.len());
                self.styles.push(style);
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&Style> {
        self.index.get(name).map(|&i| &self.styles[i])
    }

    /// The first registered style.
    pub fn default_name(&self) -> MorphResult<&str> {
        self.styles
            .first()
            .map(Style::name)
            .ok_or(MorphError::EmptyRegistry)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.styles.iter().map(Style::name)
    }

    pub fn len(&self) -> usize {
        self.styles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }

    /// Neighbour of `name` in registration order, `step` places away, wrapping.
    /// Unknown names start from the default.
    pub fn cycle(&self, name: &str, step: isize) -> Option<&str> {
        if self.styles.is_empty() {
            return None;
        }

        let len = self.styles.len() as isize;
        let current = self.index.get(name).map_or(0, |&i| i as isize);
        let next = (current + step).rem_euclid(len) as usize;

        Some(self.styles[next].name())
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use crate::grid::Size;
    use crate::morph::MorphOptions;

    use super::*;

    fn blank(frame: &Frame<'_>, _: &mut dyn RngCore) -> Grid {
        Grid::new(frame.size)
    }

    fn solid(frame: &Frame<'_>, _: &mut dyn RngCore) -> Grid {
        Grid::from_rows(vec![vec![true; frame.size.width]; frame.size.height])
    }

    #[test]
    fn builtin_order_and_arity() {
        let registry = Registry::builtin();
        let names: Vec<_> = registry.names().collect();

        assert_eq!(names, ["flicker", "cover", "coverWithBorder", "scroll"]);
        assert_eq!(registry.default_name().unwrap(), "flicker");

        let arities: Vec<_> = registry.names().map(|n| registry.get(n).unwrap().arity()).collect();
        assert_eq!(arities, [2, 1, 1, 3]);

        let scroll_slots: Vec<_> = registry.get("scroll").unwrap().slot_names().collect();
        assert_eq!(scroll_slots, ["Start Edge", "End Edge", "Edge Mapping"]);
    }

    #[test]
    fn empty_registry_has_no_default() {
        let registry = Registry::new();

        assert!(matches!(registry.default_name(), Err(MorphError::EmptyRegistry)));
        assert!(registry.get("cover").is_none());
        assert!(registry.cycle("cover", 1).is_none());
    }

    #[test]
    fn reregistering_replaces_in_place() {
        let mut registry = Registry::new();
        registry.register("a", blank, &[]).unwrap();
        registry.register("b", blank, &["One"]).unwrap();
        registry.register("a", solid, &["X", "Y"]).unwrap();

        let names: Vec<_> = registry.names().collect();
        assert_eq!(names, ["a", "b"]);
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.get("a").unwrap().arity(), 2);

        let first = Grid::parse("..");
        let options = MorphOptions::default();
        let frame = Frame {
            first: &first,
            second: &first,
            size: Size::new(2, 1),
            phase: 0.5,
            options: &options,
        };
        let mut rng = StdRng::seed_from_u64(0);

        assert_eq!(registry.get("a").unwrap().apply(&frame, &mut rng).lit_count(), 2);
    }

    #[test]
    fn too_many_slots_is_rejected() {
        let mut registry = Registry::new();
        let err = registry.register("wide", blank, &["a", "b", "c", "d"]).unwrap_err();

        assert!(matches!(err, MorphError::TooManySlots { count: 4, .. }));
        assert!(registry.is_empty());
    }

    #[test]
    fn cycle_wraps_both_ways() {
        let registry = Registry::builtin();

        assert_eq!(registry.cycle("scroll", 1), Some("flicker"));
        assert_eq!(registry.cycle("flicker", -1), Some("scroll"));
        assert_eq!(registry.cycle("cover", 2), Some("scroll"));
        assert_eq!(registry.cycle("nope", 1), Some("cover"));
    }
}
