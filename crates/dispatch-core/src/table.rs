//! Fixed-size tables indexed by a fieldless enum.
//!
//! A table is a plain `[T; N]` where `N` is the number of enum variants, so a
//! table literal that forgets a variant does not compile.  Lookups are a
//! single array index through [`Ordinal::ordinal`].
//!
//! ```rust,ignore
//! let weights = PeriodTable([4.0, 6.0, 9.0, 3.0]);
//! assert_eq!(weights[TimePeriod::Evening], 9.0);
//! ```

use crate::{CallCategory, Priority, ServiceSector, ShiftRotation, TimePeriod};

/// A fieldless enum whose variants map densely onto `0..ALL.len()`.
pub trait Ordinal: Copy + Sized + 'static {
    /// Every variant, in ordinal order.
    const ALL: &'static [Self];

    /// Dense index of this variant.
    fn ordinal(self) -> usize;
}

/// Generate an enum-indexed table type.
///
/// `enum_table! { pub struct LevelTable[ActivityLevel; 6]; }` expands to a
/// `LevelTable<T>([T; 6])` with `Index<ActivityLevel>`, `from_fn`, and `iter`.
#[macro_export]
macro_rules! enum_table {
    ($(#[$attr:meta])* $vis:vis struct $name:ident[$key:ty; $n:expr];) => {
        $(#[$attr])*
        #[derive(Clone, Copy, Debug, PartialEq, Default)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        $vis struct $name<T>(pub [T; $n]);

        impl<T> $name<T> {
            /// Build a table by evaluating `f` once per variant.
            pub fn from_fn(mut f: impl FnMut($key) -> T) -> Self {
                Self(std::array::from_fn(|i| {
                    f(<$key as $crate::table::Ordinal>::ALL[i])
                }))
            }

            /// `(variant, &value)` pairs in ordinal order.
            pub fn iter(&self) -> impl Iterator<Item = ($key, &T)> + '_ {
                <$key as $crate::table::Ordinal>::ALL
                    .iter()
                    .copied()
                    .zip(self.0.iter())
            }

            pub fn values(&self) -> std::slice::Iter<'_, T> {
                self.0.iter()
            }
        }

        impl<T> std::ops::Index<$key> for $name<T> {
            type Output = T;
            #[inline]
            fn index(&self, key: $key) -> &T {
                &self.0[$crate::table::Ordinal::ordinal(key)]
            }
        }

        impl<T> std::ops::IndexMut<$key> for $name<T> {
            #[inline]
            fn index_mut(&mut self, key: $key) -> &mut T {
                &mut self.0[$crate::table::Ordinal::ordinal(key)]
            }
        }
    };
}

enum_table! {
    /// One value per [`TimePeriod`].
    pub struct PeriodTable[TimePeriod; 4];
}

enum_table! {
    /// One value per [`ShiftRotation`].
    pub struct ShiftTable[ShiftRotation; 3];
}

enum_table! {
    /// One value per [`Priority`]; the call board's bucket array.
    pub struct PriorityTable[Priority; 4];
}

enum_table! {
    /// One value per [`ServiceSector`].
    pub struct SectorTable[ServiceSector; 3];
}

enum_table! {
    /// One value per [`CallCategory`].
    pub struct CategoryTable[CallCategory; 6];
}
