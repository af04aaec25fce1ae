//! Which part of a container tree a lookup considers.

use bitflags::bitflags;

bitflags! {
  /// A combinable mask over the three axes of a container tree.
  ///
  /// - [`Scope::PARENT`]: the ancestors of the container, nearest first.
  /// - [`Scope::LOCAL`]: the container itself.
  /// - [`Scope::CHILDREN`]: the descendants of the container, depth-first.
  ///
  /// When several axes are set, resolution prefers `LOCAL`, then `PARENT`,
  /// then `CHILDREN`.
  #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
  pub struct Scope: u8 {
    const PARENT = 1 << 0;
    const LOCAL = 1 << 1;
    const CHILDREN = 1 << 2;

    const DEFAULT = Self::LOCAL.bits();
    const UPWARD = Self::PARENT.bits() | Self::LOCAL.bits();
    const DOWNWARD = Self::LOCAL.bits() | Self::CHILDREN.bits();
    const ALL = Self::PARENT.bits() | Self::LOCAL.bits() | Self::CHILDREN.bits();
  }
}

impl Default for Scope {
  fn default() -> Self {
    Scope::DEFAULT
  }
}
