//! Visibility culling stage.
//!
//! Filters a sequence of item references through a pluggable visibility test,
//! preserving the order of survivors and accumulating frame statistics. The
//! test is supplied per task/frame (typically a frustum test owned by the
//! camera); this stage only ever sees `bound -> bool`.

use crate::args::CategoryDetails;
use crate::item::ItemBound;
use prism_math::Aabb;

/// A boxed visibility predicate, as stored by draw tasks.
///
/// Must be a pure function of the bound; it may be called any number of
/// times per item per frame.
pub type CullTest = Box<dyn Fn(&Aabb) -> bool + Send + Sync>;

/// Filter `in_items` down to the items whose bound passes `test`, preserving
/// relative order.
///
/// Side effects on `details`: `considered` grows by the input length,
/// `out_of_view` by the number of rejected items, `rendered` by the number of
/// survivors. Empty input touches nothing.
///
/// The output is pre-sized to the input length so the hot path never
/// reallocates.
pub fn cull_items<F>(test: F, details: &mut CategoryDetails, in_items: &[ItemBound]) -> Vec<ItemBound>
where
    F: Fn(&Aabb) -> bool,
{
    details.considered += in_items.len();

    let mut out_items = Vec::with_capacity(in_items.len());
    for item in in_items {
        if test(&item.bound) {
            out_items.push(*item);
        } else {
            details.out_of_view += 1;
        }
    }
    details.rendered += out_items.len();
    out_items
}
