// crates/localized-pages-core/src/merge.rs
// ============================================================================
// Module: Map Merge
// Description: Overwrite-by-key merge for ordered maps.
// Purpose: Compose translation tables with last-merge-wins semantics.
// Dependencies: Standard library collections.
// ============================================================================

//! ## Overview
//! Translation tables are composed by merging a source map over a
//! destination map. Later merges overwrite earlier values key by key, so the
//! base table is applied first and an override table second.

use std::collections::BTreeMap;

/// Merges every entry of `src` into `dst`; entries from `src` win on conflict.
///
/// Keys present only in `dst` are left untouched, so merging a partial table
/// over a complete one yields fallback behavior for the missing keys.
pub fn merge_into<K, V, I>(dst: &mut BTreeMap<K, V>, src: I)
where
    K: Ord,
    I: IntoIterator<Item = (K, V)>,
{
    for (key, value) in src {
        dst.insert(key, value);
    }
}
