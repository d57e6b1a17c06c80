//! Element configuration decision tables.
//!
//! Each table maps an upstream field value to the options allowed for the
//! next field. The tables are fixed data; [`ElementConfiguration`] consumes
//! them through [`Cascade`], which also decides whether a downstream step
//! needs the user at all.
//!
//! [`ElementConfiguration`]: super::ElementConfiguration

use super::{BuildMethod, BuildMethodIsolation, ElementType, OutsideCover, SubType};

/// Sub-types allowed for an element type. The first entry is the default.
pub fn sub_types_for(element_type: ElementType) -> &'static [SubType] {
    match element_type {
        ElementType::Wall => &[SubType::OutsideWall, SubType::IsolationWall],
        ElementType::Floor => &[SubType::UpperOpenSpace, SubType::UpperCloseRoom],
        ElementType::Ceiling => &[
            SubType::UpperOpenSpace,
            SubType::UpperCloseRoom,
            SubType::UpperRoof,
            SubType::UnderRoof,
        ],
        ElementType::ThermalBridge => &[],
    }
}

/// Build methods allowed behind an outside cover.
pub fn build_methods_for(cover: OutsideCover) -> &'static [BuildMethod] {
    match cover {
        OutsideCover::DryHang => &[
            BuildMethod::Concrete,
            BuildMethod::Blocks,
            BuildMethod::LightBuild,
        ],
        OutsideCover::Plaster => &[
            BuildMethod::Blocks,
            BuildMethod::Concrete,
            BuildMethod::AmirWall,
            BuildMethod::Baranovich,
        ],
        OutsideCover::GluedStone => &[BuildMethod::Concrete, BuildMethod::Blocks],
    }
}

/// Isolation methods allowed for a build method.
pub fn isolations_for(method: BuildMethod) -> &'static [BuildMethodIsolation] {
    match method {
        BuildMethod::Blocks => &[
            BuildMethodIsolation::NoExtraCover,
            BuildMethodIsolation::ExtraCover,
        ],
        BuildMethod::Concrete => &[
            BuildMethodIsolation::InsideIsolation,
            BuildMethodIsolation::OutsideIsolation,
        ],
        BuildMethod::AmirWall => &[BuildMethodIsolation::OutsideIsolation],
        BuildMethod::Baranovich => &[BuildMethodIsolation::InsideIsolation],
        BuildMethod::LightBuild => &[],
    }
}

/// How a downstream field behaves once its upstream value is known.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cascade<T: 'static> {
    /// No options. The step is skipped entirely.
    Skip,
    /// A single option, selected without asking the user.
    Auto(T),
    /// Several options. The field stays empty until the user picks one.
    Choose(&'static [T]),
}

impl<T: Copy> Cascade<T> {
    /// Collapse an option list.
    pub fn from_options(options: &'static [T]) -> Self {
        match options {
            [] => Cascade::Skip,
            [only] => Cascade::Auto(*only),
            _ => Cascade::Choose(options),
        }
    }

    /// The value to store in the downstream field right away.
    pub fn selected(&self) -> Option<T> {
        match self {
            Cascade::Auto(value) => Some(*value),
            Cascade::Skip | Cascade::Choose(_) => None,
        }
    }

    /// Whether the user has to be asked for this field.
    pub fn needs_input(&self) -> bool {
        matches!(self, Cascade::Choose(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sub_type_table() {
        assert_eq!(
            sub_types_for(ElementType::Wall),
            &[SubType::OutsideWall, SubType::IsolationWall]
        );
        assert_eq!(sub_types_for(ElementType::Ceiling).len(), 4);
        assert!(sub_types_for(ElementType::ThermalBridge).is_empty());
    }

    #[test]
    fn test_every_cover_offers_concrete() {
        for cover in OutsideCover::ALL {
            assert!(build_methods_for(cover).contains(&BuildMethod::Concrete), "{cover}");
        }
    }

    #[test]
    fn test_cascade_collapse() {
        assert_eq!(
            Cascade::from_options(isolations_for(BuildMethod::AmirWall)),
            Cascade::Auto(BuildMethodIsolation::OutsideIsolation)
        );
        assert_eq!(Cascade::from_options(isolations_for(BuildMethod::LightBuild)), Cascade::Skip);

        let blocks = Cascade::from_options(isolations_for(BuildMethod::Blocks));
        assert!(blocks.needs_input());
        assert_eq!(blocks.selected(), None);
    }
}
