// selection.rs - Codon-level selection pressure (dN/dS)
//
// Simplified Nei-Gojobori counting: every codon contributes one synonymous
// and two nonsynonymous sites, and a differing codon is classified as a whole
// by whether its translation changes. Leaves are compared against a
// reference sequence, not against reconstructed ancestors.

use std::collections::HashMap;
use serde::{Deserialize, Serialize};
use crate::core::distance::{canonical_base, jukes_cantor};
use crate::core::error::{PhyloError, PhyloResult};
use crate::core::tree::{PhylogeneticTree, TreeNode};
use crate::data::DatedSequence;

/// Standard genetic code, codons indexed with T=0, C=1, A=2, G=3
const GENETIC_CODE: &[u8; 64] = b"FFLLSSSSYY**CC*WLLLLPPPPHHQQRRRRIIIMTTTTNNKKSSRRVVVVAAAADDEEGGGG";

const SYNONYMOUS_SITES_PER_CODON: f64 = 1.0;
const NONSYNONYMOUS_SITES_PER_CODON: f64 = 2.0;

fn base_index(b: u8) -> Option<usize> {
    match canonical_base(b)? {
        b'T' => Some(0),
        b'C' => Some(1),
        b'A' => Some(2),
        b'G' => Some(3),
        _ => None,
    }
}

/// Translate one codon, None if it contains a gap or ambiguous base
pub fn translate_codon(codon: &[u8]) -> Option<u8> {
    if codon.len() != 3 {
        return None;
    }
    let i = base_index(codon[0])? * 16 + base_index(codon[1])? * 4 + base_index(codon[2])?;
    Some(GENETIC_CODE[i])
}

/// dN/dS for one sequence pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DnDsEstimate {
    pub dnds: f64,
    pub dn: f64,
    pub ds: f64,
    pub codons: usize,
    pub synonymous_differences: usize,
    pub nonsynonymous_differences: usize,
}

/// dS > 0: dN/dS; otherwise +inf when dN > 0, and 1 (neutral) when nothing changed
pub fn dnds_ratio(dn: f64, ds: f64) -> f64 {
    if ds > 0.0 {
        dn / ds
    } else if dn > 0.0 {
        f64::INFINITY
    } else {
        1.0
    }
}

/// Compare two aligned coding sequences codon by codon.
///
/// Returns `Ok(None)` when no complete codon without gaps or ambiguity is shared.
pub fn compute_dnds(seq1: &str, seq2: &str) -> PhyloResult<Option<DnDsEstimate>> {
    if seq1.len() != seq2.len() {
        return Err(PhyloError::length_mismatch("seq1", "seq2", seq1.len(), seq2.len()));
    }
    Ok(dnds_bytes(seq1.as_bytes(), seq2.as_bytes()))
}

fn dnds_bytes(seq1: &[u8], seq2: &[u8]) -> Option<DnDsEstimate> {
    let usable = seq1.len().min(seq2.len()) / 3 * 3;

    let mut codons = 0;
    let mut syn_diffs = 0;
    let mut nonsyn_diffs = 0;

    for (c1, c2) in seq1[..usable].chunks_exact(3).zip(seq2[..usable].chunks_exact(3)) {
        let (Some(aa1), Some(aa2)) = (translate_codon(c1), translate_codon(c2)) else {
            continue;
        };
        codons += 1;

        let differences = c1
            .iter()
            .zip(c2.iter())
            .filter(|(a, b)| canonical_base(**a) != canonical_base(**b))
            .count();
        if differences == 0 {
            continue;
        }
        if aa1 == aa2 {
            syn_diffs += differences;
        } else {
            nonsyn_diffs += differences;
        }
    }

    if codons == 0 {
        return None;
    }

    let syn_sites = codons as f64 * SYNONYMOUS_SITES_PER_CODON;
    let nonsyn_sites = codons as f64 * NONSYNONYMOUS_SITES_PER_CODON;
    let ps = syn_diffs as f64 / syn_sites;
    let pn = nonsyn_diffs as f64 / nonsyn_sites;
    let ds = jukes_cantor(ps);
    let dn = jukes_cantor(pn);

    Some(DnDsEstimate {
        dnds: dnds_ratio(dn, ds),
        dn,
        ds,
        codons,
        synonymous_differences: syn_diffs,
        nonsynonymous_differences: nonsyn_diffs,
    })
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BranchDnDs {
    pub node_id: String,
    pub reference_id: String,
    pub dnds: f64,
    pub dn: f64,
    pub ds: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SelectionResult {
    pub branch_dnds: Vec<BranchDnDs>,
    /// Sum of dN over sum of dS; None when no branch could be compared
    pub tree_dnds: Option<f64>,
}

/// Earliest dated leaf, first in depth-first order on ties or when nothing is dated
fn outgroup_leaf<'a>(leaves: &[&'a TreeNode]) -> Option<&'a DatedSequence> {
    let mut best: Option<&'a DatedSequence> = None;
    for leaf in leaves.iter().copied() {
        let Some(seq) = leaf.sequence.as_ref() else {
            continue;
        };
        best = match best {
            None => Some(seq),
            Some(current) if seq.has_date() && (!current.has_date() || seq.date < current.date) => Some(seq),
            keep => keep,
        };
    }
    best
}

fn visit<'a>(
    node: &'a TreeNode,
    nearest: Option<&'a DatedSequence>,
    outgroup: Option<&'a DatedSequence>,
    out: &mut Vec<BranchDnDs>,
) -> PhyloResult<()> {
    if node.is_leaf() {
        let Some(seq) = node.sequence.as_ref() else {
            return Ok(());
        };
        let reference = nearest.or(outgroup).filter(|r| r.id != seq.id);
        if let Some(reference) = reference {
            if seq.sequence.len() != reference.sequence.len() {
                return Err(PhyloError::length_mismatch(
                    &seq.id,
                    &reference.id,
                    seq.sequence.len(),
                    reference.sequence.len(),
                ));
            }
            if let Some(est) = dnds_bytes(seq.sequence.as_bytes(), reference.sequence.as_bytes()) {
                out.push(BranchDnDs {
                    node_id: node.id.clone(),
                    reference_id: reference.id.clone(),
                    dnds: est.dnds,
                    dn: est.dn,
                    ds: est.ds,
                });
            }
        }
        return Ok(());
    }

    let nearest = node.sequence.as_ref().or(nearest);
    for child in &node.children {
        visit(child, nearest, outgroup, out)?;
    }
    Ok(())
}

/// Per-leaf and tree-wide dN/dS.
///
/// Each leaf is compared with the closest ancestor that carries a sequence;
/// built trees only carry sequences on leaves, so in practice the reference
/// is the outgroup (earliest sampled) leaf.
pub fn compute_selection(tree: &PhylogeneticTree) -> PhyloResult<SelectionResult> {
    let leaves = tree.leaves();
    let outgroup = outgroup_leaf(&leaves);

    let mut branch_dnds = Vec::new();
    visit(&tree.root, None, outgroup, &mut branch_dnds)?;

    let tree_dnds = if branch_dnds.is_empty() {
        None
    } else {
        let sum_dn: f64 = branch_dnds.iter().map(|b| b.dn).sum();
        let sum_ds: f64 = branch_dnds.iter().map(|b| b.ds).sum();
        Some(dnds_ratio(sum_dn, sum_ds))
    };

    Ok(SelectionResult { branch_dnds, tree_dnds })
}

/// New tree with each compared leaf's dN/dS filled in
pub fn annotate_selection(tree: &PhylogeneticTree, selection: &SelectionResult) -> PhylogeneticTree {
    fn annotate(node: &TreeNode, by_leaf: &HashMap<&str, f64>) -> TreeNode {
        let dnds = if node.is_leaf() {
            by_leaf.get(node.id.as_str()).copied().or(node.dnds)
        } else {
            node.dnds
        };
        TreeNode {
            id: node.id.clone(),
            distance: node.distance,
            height: node.height,
            children: node.children.iter().map(|c| annotate(c, by_leaf)).collect(),
            sequence: node.sequence.clone(),
            dnds,
        }
    }

    let by_leaf: HashMap<&str, f64> = selection
        .branch_dnds
        .iter()
        .map(|b| (b.node_id.as_str(), b.dnds))
        .collect();

    PhylogeneticTree {
        root: annotate(&tree.root, &by_leaf),
        leaf_count: tree.leaf_count,
        height: tree.height,
        is_clock_calibrated: tree.is_clock_calibrated,
        substitution_rate: tree.substitution_rate,
        clock_r2: tree.clock_r2,
        clamped_branches: tree.clamped_branches,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::tree::build_tree;

    #[test]
    fn test_translation() {
        assert_eq!(translate_codon(b"ATG"), Some(b'M'));
        assert_eq!(translate_codon(b"ATA"), Some(b'I'));
        assert_eq!(translate_codon(b"TAA"), Some(b'*'));
        assert_eq!(translate_codon(b"GGC"), Some(b'G'));
        assert_eq!(translate_codon(b"ttt"), Some(b'F'));
        assert_eq!(translate_codon(b"AN-"), None);
    }

    #[test]
    fn test_identical_codons_are_neutral() {
        let est = compute_dnds("ATGGCCAAA", "ATGGCCAAA").unwrap().unwrap();
        assert_eq!(est.dnds, 1.0);
        assert_eq!(est.dn, 0.0);
        assert_eq!(est.ds, 0.0);
        assert_eq!(est.codons, 3);
    }

    #[test]
    fn test_single_nonsynonymous_change() {
        // Met -> Ile
        let est = compute_dnds("ATG", "ATA").unwrap().unwrap();
        assert!(est.dnds >= 0.0);
        assert!(est.dnds.is_infinite());
        assert_eq!(est.nonsynonymous_differences, 1);
        assert!((est.dn - jukes_cantor(0.5)).abs() < 1e-12);
    }

    #[test]
    fn test_synonymous_change() {
        // GCC -> GCA both Ala; AAA unchanged
        let est = compute_dnds("GCCAAA", "GCAAAA").unwrap().unwrap();
        assert_eq!(est.synonymous_differences, 1);
        assert_eq!(est.dn, 0.0);
        assert!(est.ds > 0.0);
        assert_eq!(est.dnds, 0.0);
    }

    #[test]
    fn test_mixed_changes_ratio() {
        // codon 1 synonymous (CTT->CTC, Leu), codon 2 nonsynonymous (AAA->GAA, Lys->Glu)
        let est = compute_dnds("CTTAAAGGG", "CTCGAAGGG").unwrap().unwrap();
        let ds = jukes_cantor(1.0 / 3.0);
        let dn = jukes_cantor(1.0 / 6.0);
        assert!((est.ds - ds).abs() < 1e-12);
        assert!((est.dn - dn).abs() < 1e-12);
        assert!((est.dnds - dn / ds).abs() < 1e-12);
    }

    #[test]
    fn test_gapped_codons_skipped_and_truncation() {
        // Second codon gapped, trailing partial codon ignored
        let est = compute_dnds("ATG-CCAA", "ATGGCCAT").unwrap().unwrap();
        assert_eq!(est.codons, 1);
        assert_eq!(est.dnds, 1.0);
    }

    #[test]
    fn test_no_comparable_codon() {
        assert_eq!(compute_dnds("AT", "AT").unwrap(), None);
        assert_eq!(compute_dnds("NNN---", "ATGATG").unwrap(), None);
        assert!(compute_dnds("ATG", "AT").is_err());
    }

    #[test]
    fn test_selection_against_outgroup() {
        let input = vec![
            DatedSequence::new("ref", "ATGGCCAAA", 2018.0),
            DatedSequence::new("syn", "ATGGCAAAA", 2019.0),
            DatedSequence::new("nonsyn", "ATAGCCAAA", 2020.0),
        ];
        let tree = build_tree(&input).unwrap();
        let result = compute_selection(&tree).unwrap();

        assert_eq!(result.branch_dnds.len(), 2);
        assert!(result.branch_dnds.iter().all(|b| b.reference_id == "ref"));
        let syn = result.branch_dnds.iter().find(|b| b.node_id == "syn").unwrap();
        assert_eq!(syn.dnds, 0.0);
        let nonsyn = result.branch_dnds.iter().find(|b| b.node_id == "nonsyn").unwrap();
        assert!(nonsyn.dnds.is_infinite());

        // Aggregate is a ratio of sums, not a mean of ratios
        let expected = (syn.dn + nonsyn.dn) / (syn.ds + nonsyn.ds);
        assert!((result.tree_dnds.unwrap() - expected).abs() < 1e-12);

        let annotated = annotate_selection(&tree, &result);
        assert_eq!(annotated.root.find("syn").unwrap().dnds, Some(0.0));
        assert_eq!(annotated.root.find("ref").unwrap().dnds, None);
        assert!(tree.root.find("syn").unwrap().dnds.is_none());
    }

    #[test]
    fn test_annotation_covers_every_compared_leaf() {
        let input = vec![
            DatedSequence::new("ref", "ATGGCCAAACTT", 2018.0),
            DatedSequence::new("syn", "ATGGCAAAACTT", 2019.0),
            DatedSequence::new("nonsyn", "ATAGCCAAACTT", 2020.0),
            DatedSequence::new("mixed", "ATAGCAAAACTT", 2021.0),
            DatedSequence::new("same", "ATGGCCAAACTT", 2022.0),
        ];
        let tree = build_tree(&input).unwrap();
        let result = compute_selection(&tree).unwrap();
        assert_eq!(result.branch_dnds.len(), 4);

        let annotated = annotate_selection(&tree, &result);
        for branch in &result.branch_dnds {
            let leaf = annotated.root.find(&branch.node_id).unwrap();
            assert!(leaf.is_leaf());
            assert_eq!(leaf.dnds, Some(branch.dnds));
        }
        assert_eq!(annotated.root.find("same").unwrap().dnds, Some(1.0));
        assert_eq!(annotated.root.find("ref").unwrap().dnds, None);

        fn internal_unannotated(node: &TreeNode) -> bool {
            node.is_leaf() || (node.dnds.is_none() && node.children.iter().all(internal_unannotated))
        }
        assert!(internal_unannotated(&annotated.root));
        assert_eq!(annotated.leaf_count, tree.leaf_count);
    }

    #[test]
    fn test_selection_single_leaf() {
        let tree = build_tree(&[DatedSequence::new("x", "ATG", 2020.0)]).unwrap();
        let result = compute_selection(&tree).unwrap();
        assert!(result.branch_dnds.is_empty());
        assert_eq!(result.tree_dnds, None);
    }
}
