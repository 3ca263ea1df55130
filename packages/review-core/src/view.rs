//! Render-ready projection of a match detail.
//!
//! [`MatchView::build`] runs the diff engine over the compared attributes
//! (name, family name, affiliation, ORCID) and the graph builder over the
//! shared-collaborator evidence, so a renderer only has to paint tokens and
//! nodes.

use review_api_client::{AuthorProfile, MatchDetail, MatchScores, Publication};
use serde::Serialize;

use crate::diff::{compute_diff, has_disagreement, DiffToken};
use crate::graph::{build_graph, EvidenceGraph};

/// Total score above which a match is shown as high confidence.
pub const HIGH_CONFIDENCE_THRESHOLD: f64 = 80.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfidenceBand {
    High,
    Review,
}

impl ConfidenceBand {
    pub fn for_score(total: f64) -> Self {
        if total > HIGH_CONFIDENCE_THRESHOLD {
            Self::High
        } else {
            Self::Review
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::High => "High Confidence",
            Self::Review => "Needs Review",
        }
    }
}

/// One compared attribute, diffed from both sides.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttributeDiff {
    pub label: &'static str,
    pub value_a: String,
    pub value_b: String,
    /// Tokens of `value_a` classified against `value_b`
    pub tokens_a: Vec<DiffToken>,
    /// Tokens of `value_b` classified against `value_a`
    pub tokens_b: Vec<DiffToken>,
    pub has_disagreement: bool,
}

impl AttributeDiff {
    fn new(label: &'static str, value_a: &str, value_b: &str) -> Self {
        let tokens_a = compute_diff(value_a, value_b);
        let tokens_b = compute_diff(value_b, value_a);
        let has_disagreement = has_disagreement(&tokens_a) || has_disagreement(&tokens_b);
        Self {
            label,
            value_a: value_a.to_string(),
            value_b: value_b.to_string(),
            tokens_a,
            tokens_b,
            has_disagreement,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchView {
    pub id_a: i64,
    pub id_b: i64,
    pub scores: MatchScores,
    pub confidence: ConfidenceBand,
    pub attributes: Vec<AttributeDiff>,
    pub graph: EvidenceGraph,
    pub publications_a: Vec<Publication>,
    pub publications_b: Vec<Publication>,
}

impl MatchView {
    pub fn build(detail: &MatchDetail) -> Self {
        let a = &detail.author_a;
        let b = &detail.author_b;

        let attributes = vec![
            AttributeDiff::new("Full Name", &a.name, &b.name),
            AttributeDiff::new("Family Name", family_name(a), family_name(b)),
            AttributeDiff::new("Affiliation", affiliation(a), affiliation(b)),
            AttributeDiff::new("ORCID", orcid(a), orcid(b)),
        ];

        Self {
            id_a: a.id,
            id_b: b.id,
            scores: detail.scores,
            confidence: ConfidenceBand::for_score(detail.scores.total),
            attributes,
            graph: build_graph(&a.name, &b.name, &detail.evidence),
            publications_a: a.publications.clone(),
            publications_b: b.publications.clone(),
        }
    }

    /// Attributes on which the two records disagree.
    pub fn disagreements(&self) -> impl Iterator<Item = &AttributeDiff> {
        self.attributes.iter().filter(|attr| attr.has_disagreement)
    }
}

fn family_name(profile: &AuthorProfile) -> &str {
    profile.family_name.as_deref().unwrap_or_default()
}

fn affiliation(profile: &AuthorProfile) -> &str {
    profile.affiliation.as_deref().unwrap_or_default()
}

fn orcid(profile: &AuthorProfile) -> &str {
    profile.orcid.as_deref().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::DiffKind;
    use crate::testing::{candidate, detail_for};
    use review_api_client::SharedCoauthor;

    fn sample_detail() -> MatchDetail {
        let mut detail = detail_for(&candidate(1, 2, 85.5));
        detail.author_a.name = "Jane Smith".into();
        detail.author_b.name = "Jane A. Smith".into();
        detail.author_a.family_name = Some("Smith".into());
        detail.author_b.family_name = Some("smith".into());
        detail.author_a.affiliation = Some("MIT".into());
        detail.author_a.orcid = Some("0000-0002-1825-0097".into());
        detail.author_b.orcid = Some("0000-0002-1825-0097".into());
        detail.evidence = vec![SharedCoauthor {
            name: "R. Jones".into(),
            total_overlap: Some(3),
            count_a: 2,
            count_b: 1,
        }];
        detail
    }

    #[test]
    fn test_build_collects_attribute_diffs() {
        let view = MatchView::build(&sample_detail());

        let labels: Vec<_> = view.attributes.iter().map(|a| a.label).collect();
        assert_eq!(labels, vec!["Full Name", "Family Name", "Affiliation", "ORCID"]);

        let name = &view.attributes[0];
        assert!(name.has_disagreement);
        assert_eq!(name.tokens_a.last().map(|t| t.kind), Some(DiffKind::Changed));

        // Case-only difference is not a disagreement
        assert!(!view.attributes[1].has_disagreement);

        let affiliation = &view.attributes[2];
        assert!(affiliation.has_disagreement);
        assert_eq!(affiliation.value_b, "");
        assert_eq!(affiliation.tokens_a[0].kind, DiffKind::Added);

        let orcid = &view.attributes[3];
        assert!(!orcid.has_disagreement);
        assert_eq!(orcid.value_a, "0000-0002-1825-0097");
    }

    #[test]
    fn test_orcid_mismatch_is_a_disagreement() {
        let mut detail = sample_detail();
        detail.author_b.orcid = Some("0000-0001-5109-3700".into());

        let view = MatchView::build(&detail);
        let orcid = &view.attributes[3];
        assert!(orcid.has_disagreement);
        assert_eq!(orcid.tokens_b[0].kind, DiffKind::Changed);
        assert_eq!(view.disagreements().count(), 3);
    }

    #[test]
    fn test_build_graph_and_confidence() {
        let view = MatchView::build(&sample_detail());

        assert_eq!(view.confidence, ConfidenceBand::High);
        assert_eq!(view.graph.nodes.len(), 3);
        assert_eq!(view.graph.links.len(), 3);
        assert_eq!(view.disagreements().count(), 2);
    }

    #[test]
    fn test_confidence_band_boundary() {
        assert_eq!(ConfidenceBand::for_score(80.0), ConfidenceBand::Review);
        assert_eq!(ConfidenceBand::for_score(80.01), ConfidenceBand::High);
    }

    #[test]
    fn test_view_serializes_for_renderers() {
        let value = serde_json::to_value(MatchView::build(&sample_detail())).unwrap();

        assert_eq!(value["confidence"], "high");
        assert_eq!(value["attributes"][0]["tokens_a"][0]["kind"], "equal");
        assert_eq!(value["graph"]["nodes"][2]["group"], "shared");
    }

    #[test]
    fn test_missing_attributes_on_both_sides_agree() {
        let view = MatchView::build(&detail_for(&candidate(1, 2, 40.0)));

        let affiliation = &view.attributes[2];
        assert!(!affiliation.has_disagreement);
        assert_eq!(affiliation.tokens_a[0].text, crate::diff::EMPTY_PLACEHOLDER);
        let orcid = &view.attributes[3];
        assert!(!orcid.has_disagreement);
        assert_eq!(orcid.tokens_b[0].text, crate::diff::EMPTY_PLACEHOLDER);
        assert_eq!(view.confidence, ConfidenceBand::Review);
        assert!(!view.graph.has_evidence());
    }
}
