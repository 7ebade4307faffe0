use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

pub const KOFAMSCAN: &str = "KofamScan";
pub const INTERPROSCAN: &str = "InterProScan";
pub const EGGNOG_COMBINED: &str = "EggNOG (combined)";
pub const FANTASIA_POST: &str = "FANTASIA (post-filtering)";

/// The three sequence-homology tools FANTASIA is compared against
pub const MAIN_TOOLS: [&str; 3] = [KOFAMSCAN, INTERPROSCAN, EGGNOG_COMBINED];

/// A gene set together with its size
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NamedSet {
    pub genes: BTreeSet<String>,
    pub count: usize,
}

impl From<BTreeSet<String>> for NamedSet {
    fn from(genes: BTreeSet<String>) -> Self {
        let count = genes.len();
        Self { genes, count }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct OverlapResult {
    pub all_tools_union: NamedSet,
    pub all_tools_intersection: NamedSet,
    pub main_tools_union: NamedSet,
    pub main_tools_intersection: NamedSet,
    pub fantasia_exclusive: NamedSet,
}

impl OverlapResult {
    /// Named results in report order
    pub fn pairs(&self) -> [(&'static str, &NamedSet); 5] {
        [
            ("all_tools_combined", &self.all_tools_union),
            ("annotated_by_all", &self.all_tools_intersection),
            ("main_tools_combined", &self.main_tools_union),
            ("main_tools_overlap", &self.main_tools_intersection),
            ("fantasia_unique", &self.fantasia_exclusive),
        ]
    }
}

fn union<'a>(sets: impl IntoIterator<Item = &'a BTreeSet<String>>) -> BTreeSet<String> {
    sets.into_iter().flatten().cloned().collect()
}

fn intersection<'a>(sets: impl IntoIterator<Item = &'a BTreeSet<String>>) -> BTreeSet<String> {
    let mut sets = sets.into_iter();
    let Some(first) = sets.next() else {
        return BTreeSet::new();
    };
    sets.fold(first.clone(), |acc, set| acc.intersection(set).cloned().collect())
}

/// Unions, intersections and FANTASIA-only genes over per-tool gene sets.
///
/// Three-tool statistics need all of [`MAIN_TOOLS`]; with any missing they
/// stay empty. FANTASIA-only genes are the post-filtering set minus every
/// main-tool set that is present.
pub fn compute_overlaps(tool_sets: &BTreeMap<String, BTreeSet<String>>) -> OverlapResult {
    let mut result = OverlapResult {
        all_tools_union: union(tool_sets.values()).into(),
        all_tools_intersection: intersection(tool_sets.values()).into(),
        ..Default::default()
    };

    let present: Vec<&BTreeSet<String>> = MAIN_TOOLS.iter().filter_map(|name| tool_sets.get(*name)).collect();
    let main_union = union(present.iter().copied());

    if present.len() == MAIN_TOOLS.len() {
        result.main_tools_union = main_union.clone().into();
        result.main_tools_intersection = intersection(present.iter().copied()).into();
    }

    if let Some(fantasia) = tool_sets.get(FANTASIA_POST) {
        result.fantasia_exclusive = fantasia.difference(&main_union).cloned().collect::<BTreeSet<_>>().into();
    }

    tracing::debug!(
        "Overlap over {} tool sets: union {}, intersection {}",
        tool_sets.len(),
        result.all_tools_union.count,
        result.all_tools_intersection.count
    );

    result
}
