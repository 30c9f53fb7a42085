// tree.rs - Rooted binary trees and distance-based tree builders (UPGMA, NJ)

use std::collections::BTreeSet;
use std::fmt::Write as _;
use std::str::FromStr;
use serde::{Deserialize, Serialize};
use crate::core::distance::{compute_distance_matrix, DistanceMatrix, DistanceModel};
use crate::core::error::{PhyloError, PhyloResult};
use crate::data::DatedSequence;

/// A node of a rooted tree. Internal nodes have exactly two children,
/// leaves carry the sequence they were built from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeNode {
    pub id: String,
    /// Branch length to the parent (0 for the root)
    pub distance: f64,
    /// Accumulated branch length from the root
    pub height: f64,
    pub children: Vec<TreeNode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sequence: Option<DatedSequence>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dnds: Option<f64>,
}

impl TreeNode {
    pub fn leaf(sequence: DatedSequence, distance: f64) -> Self {
        Self {
            id: sequence.id.clone(),
            distance,
            height: 0.0,
            children: Vec::new(),
            sequence: Some(sequence),
            dnds: None,
        }
    }

    pub fn internal(id: String, distance: f64, left: TreeNode, right: TreeNode) -> Self {
        Self {
            id,
            distance,
            height: 0.0,
            children: vec![left, right],
            sequence: None,
            dnds: None,
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Leaves in depth-first, left-to-right order
    pub fn leaves(&self) -> Vec<&TreeNode> {
        let mut out = Vec::new();
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            if node.is_leaf() {
                out.push(node);
            } else {
                stack.extend(node.children.iter().rev());
            }
        }
        out
    }

    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(TreeNode::node_count).sum::<usize>()
    }

    pub fn find(&self, id: &str) -> Option<&TreeNode> {
        if self.id == id {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find(id))
    }

    fn assign_heights(&mut self, parent_height: f64) {
        self.height = parent_height + self.distance;
        let height = self.height;
        for child in &mut self.children {
            child.assign_heights(height);
        }
    }

    fn write_newick(&self, out: &mut String) {
        if !self.is_leaf() {
            out.push('(');
            for (i, child) in self.children.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                child.write_newick(out);
            }
            out.push(')');
        }
        out.push_str(&newick_label(&self.id));
        let _ = write!(out, ":{}", self.distance);
    }
}

/// Quote labels that contain Newick metacharacters
fn newick_label(label: &str) -> String {
    if label.chars().any(|c| "()[]':;, \t".contains(c)) {
        format!("'{}'", label.replace('\'', "''"))
    } else {
        label.to_string()
    }
}

/// A rooted tree built from a set of dated sequences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhylogeneticTree {
    pub root: TreeNode,
    pub leaf_count: usize,
    /// Greatest root-to-leaf height
    pub height: f64,
    pub is_clock_calibrated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub substitution_rate: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clock_r2: Option<f64>,
    /// Branches whose raw length came out negative and were set to 0
    pub clamped_branches: usize,
}

impl PhylogeneticTree {
    /// Wrap a freshly built root: heights are assigned top-down from 0
    pub fn from_root(mut root: TreeNode, clamped_branches: usize) -> Self {
        root.distance = 0.0;
        root.assign_heights(0.0);
        let leaves = root.leaves();
        let leaf_count = leaves.len();
        let height = leaves.iter().map(|l| l.height).fold(0.0, f64::max);
        Self {
            root,
            leaf_count,
            height,
            is_clock_calibrated: false,
            substitution_rate: None,
            clock_r2: None,
            clamped_branches,
        }
    }

    pub fn leaves(&self) -> Vec<&TreeNode> {
        self.root.leaves()
    }

    /// Heights of internal nodes (coalescent events)
    pub fn internal_heights(&self) -> Vec<f64> {
        let mut heights = Vec::new();
        let mut stack = vec![&self.root];
        while let Some(node) = stack.pop() {
            if !node.is_leaf() {
                heights.push(node.height);
                stack.extend(node.children.iter());
            }
        }
        heights
    }

    /// Heights of leaves (sampling events)
    pub fn leaf_heights(&self) -> Vec<f64> {
        self.leaves().iter().map(|l| l.height).collect()
    }

    /// Root-to-tip branch-length sums, summed along each path from the root
    pub fn root_to_tip_distances(&self) -> Vec<(&TreeNode, f64)> {
        let mut out = Vec::new();
        let mut stack = vec![(&self.root, 0.0)];
        while let Some((node, acc)) = stack.pop() {
            if node.is_leaf() {
                out.push((node, acc));
            } else {
                for child in node.children.iter().rev() {
                    stack.push((child, acc + child.distance));
                }
            }
        }
        out
    }

    pub fn to_newick(&self) -> String {
        let mut out = String::new();
        self.root.write_newick(&mut out);
        out.push(';');
        out
    }
}

/// How to resolve equal minimum distances during clustering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TieBreak {
    /// Keep the first minimal pair encountered in cluster-id order
    #[default]
    FirstPair,
    /// Keep the last minimal pair encountered in cluster-id order
    LastPair,
}

impl FromStr for TieBreak {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "first" | "first-pair" => Ok(TieBreak::FirstPair),
            "last" | "last-pair" => Ok(TieBreak::LastPair),
            _ => Err(format!("Invalid tie-break rule: {}. Use: first, last", s)),
        }
    }
}

impl TieBreak {
    #[inline]
    fn prefers(&self, candidate: f64, best: f64) -> bool {
        match self {
            TieBreak::FirstPair => candidate < best,
            TieBreak::LastPair => candidate <= best,
        }
    }
}

/// Tree construction algorithm
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TreeMethod {
    #[default]
    Upgma,
    NeighborJoining,
}

impl FromStr for TreeMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "upgma" => Ok(TreeMethod::Upgma),
            "nj" | "neighbor-joining" | "neighbour-joining" => Ok(TreeMethod::NeighborJoining),
            _ => Err(format!("Invalid tree method: {}. Use: upgma, nj", s)),
        }
    }
}

impl TreeMethod {
    pub fn description(&self) -> &str {
        match self {
            TreeMethod::Upgma => "UPGMA (ultrametric)",
            TreeMethod::NeighborJoining => "neighbor joining, rooted on earliest sample",
        }
    }
}

/// Build a UPGMA tree from Jukes-Cantor distances
pub fn build_tree(sequences: &[DatedSequence]) -> PhyloResult<PhylogeneticTree> {
    if sequences.is_empty() {
        return Err(PhyloError::EmptyInput);
    }
    let matrix = compute_distance_matrix(sequences, DistanceModel::Jc69)?;
    build_upgma_tree(sequences, &matrix, TieBreak::FirstPair)
}

/// Build a tree with the chosen method from a precomputed distance matrix
pub fn build_tree_with_method(
    sequences: &[DatedSequence],
    matrix: &DistanceMatrix,
    method: TreeMethod,
    tie_break: TieBreak,
) -> PhyloResult<PhylogeneticTree> {
    match method {
        TreeMethod::Upgma => build_upgma_tree(sequences, matrix, tie_break),
        TreeMethod::NeighborJoining => build_nj_tree(sequences, matrix, tie_break),
    }
}

fn check_inputs(sequences: &[DatedSequence], matrix: &DistanceMatrix) -> PhyloResult<()> {
    if sequences.is_empty() {
        return Err(PhyloError::EmptyInput);
    }
    if matrix.len() != sequences.len() {
        return Err(PhyloError::MatrixSize { expected: sequences.len(), found: matrix.len() });
    }
    Ok(())
}

/// Cluster record in the UPGMA arena; ids are stable for the whole run
struct Cluster {
    members: Vec<usize>,
    height: f64,
    children: Option<(usize, usize)>,
    branch: f64,
}

/// Mean distance over all original leaf pairs between two clusters
fn average_linkage(matrix: &DistanceMatrix, a: &[usize], b: &[usize]) -> f64 {
    let total: f64 = a
        .iter()
        .flat_map(|&i| b.iter().map(move |&j| (i, j)))
        .map(|(i, j)| matrix.get(i, j))
        .sum();
    total / (a.len() * b.len()) as f64
}

/// Minimum-distance pair among active clusters, scanned in id order
fn closest_pair(
    active: &BTreeSet<usize>,
    working: &[Vec<f64>],
    tie_break: TieBreak,
) -> Option<(usize, usize, f64)> {
    let ids: Vec<usize> = active.iter().copied().collect();
    let mut best: Option<(usize, usize, f64)> = None;
    for (x, &i) in ids.iter().enumerate() {
        for &j in &ids[x + 1..] {
            let d = working[i][j];
            let better = match best {
                None => true,
                Some((_, _, best_d)) => tie_break.prefers(d, best_d),
            };
            if better {
                best = Some((i, j, d));
            }
        }
    }
    best
}

/// UPGMA over a precomputed distance matrix
pub fn build_upgma_tree(
    sequences: &[DatedSequence],
    matrix: &DistanceMatrix,
    tie_break: TieBreak,
) -> PhyloResult<PhylogeneticTree> {
    check_inputs(sequences, matrix)?;
    let n = sequences.len();
    if n == 1 {
        return Ok(PhylogeneticTree::from_root(TreeNode::leaf(sequences[0].clone(), 0.0), 0));
    }

    let capacity = 2 * n - 1;
    let mut arena: Vec<Cluster> = (0..n)
        .map(|i| Cluster { members: vec![i], height: 0.0, children: None, branch: 0.0 })
        .collect();
    let mut working = vec![vec![0.0; capacity]; capacity];
    for (i, row) in working.iter_mut().enumerate().take(n) {
        row[..n].copy_from_slice(&matrix.values[i]);
    }
    let mut active: BTreeSet<usize> = (0..n).collect();
    let mut clamped = 0;

    while active.len() > 1 {
        let Some((a, b, min_distance)) = closest_pair(&active, &working, tie_break) else {
            break;
        };
        let new_height = min_distance / 2.0;

        for child in [a, b] {
            let raw = new_height - arena[child].height;
            if raw < 0.0 {
                clamped += 1;
            }
            arena[child].branch = raw.max(0.0);
        }

        let mut members = arena[a].members.clone();
        members.extend_from_slice(&arena[b].members);
        let id = arena.len();
        arena.push(Cluster { members, height: new_height, children: Some((a, b)), branch: 0.0 });

        active.remove(&a);
        active.remove(&b);
        for &k in &active {
            let d = average_linkage(matrix, &arena[id].members, &arena[k].members);
            working[id][k] = d;
            working[k][id] = d;
        }
        active.insert(id);
    }

    let root_id = arena.len() - 1;
    let root = materialize_cluster(&arena, root_id, sequences);
    Ok(PhylogeneticTree::from_root(root, clamped))
}

fn materialize_cluster(arena: &[Cluster], id: usize, sequences: &[DatedSequence]) -> TreeNode {
    let cluster = &arena[id];
    match cluster.children {
        None => TreeNode::leaf(sequences[cluster.members[0]].clone(), cluster.branch),
        Some((left, right)) => TreeNode::internal(
            format!("node_{}", id - sequences.len()),
            cluster.branch,
            materialize_cluster(arena, left, sequences),
            materialize_cluster(arena, right, sequences),
        ),
    }
}

/// Index of the earliest dated sequence, the first one on ties or when nothing is dated
pub(crate) fn earliest_sample(sequences: &[DatedSequence]) -> usize {
    let mut best: Option<(usize, f64)> = None;
    for (i, seq) in sequences.iter().enumerate() {
        if !seq.has_date() {
            continue;
        }
        if best.map_or(true, |(_, d)| seq.date < d) {
            best = Some((i, seq.date));
        }
    }
    best.map_or(0, |(i, _)| i)
}

/// Saitou-Nei neighbor joining, rooted on the pendant edge of the earliest sample.
///
/// The earliest sample becomes the root's first child at distance 0, so
/// root-to-tip distances are patristic distances from that sample.
pub fn build_nj_tree(
    sequences: &[DatedSequence],
    matrix: &DistanceMatrix,
    tie_break: TieBreak,
) -> PhyloResult<PhylogeneticTree> {
    check_inputs(sequences, matrix)?;
    let n = sequences.len();
    if n == 1 {
        return Ok(PhylogeneticTree::from_root(TreeNode::leaf(sequences[0].clone(), 0.0), 0));
    }

    // Unrooted tree: leaves 0..n, joined nodes from n upwards
    let capacity = 2 * n - 2;
    let mut adjacency: Vec<Vec<(usize, f64)>> = vec![Vec::new(); n];
    let mut working = vec![vec![0.0; capacity.max(n)]; capacity.max(n)];
    for (i, row) in working.iter_mut().enumerate().take(n) {
        row[..n].copy_from_slice(&matrix.values[i]);
    }
    let mut active: Vec<usize> = (0..n).collect();
    let mut clamped = 0;

    let mut connect = |adjacency: &mut Vec<Vec<(usize, f64)>>, a: usize, b: usize, length: f64| {
        if length < 0.0 {
            clamped += 1;
        }
        let length = length.max(0.0);
        adjacency[a].push((b, length));
        adjacency[b].push((a, length));
    };

    while active.len() > 2 {
        let m = active.len();
        let row_sums: Vec<f64> = active
            .iter()
            .map(|&i| active.iter().map(|&k| working[i][k]).sum())
            .collect();

        let mut best: Option<(usize, usize, f64)> = None;
        for x in 0..m {
            for y in x + 1..m {
                let q = (m - 2) as f64 * working[active[x]][active[y]] - row_sums[x] - row_sums[y];
                let better = match best {
                    None => true,
                    Some((_, _, best_q)) => tie_break.prefers(q, best_q),
                };
                if better {
                    best = Some((x, y, q));
                }
            }
        }
        let Some((x, y, _)) = best else { break };
        let (i, j) = (active[x], active[y]);
        let d_ij = working[i][j];
        let branch_i = d_ij / 2.0 + (row_sums[x] - row_sums[y]) / (2.0 * (m - 2) as f64);
        let branch_j = d_ij - branch_i;

        let u = adjacency.len();
        adjacency.push(Vec::new());
        connect(&mut adjacency, u, i, branch_i);
        connect(&mut adjacency, u, j, branch_j);

        for &k in &active {
            if k != i && k != j {
                let d = (working[i][k] + working[j][k] - d_ij) / 2.0;
                working[u][k] = d;
                working[k][u] = d;
            }
        }
        active.retain(|&k| k != i && k != j);
        active.push(u);
    }

    if let [a, b] = active[..] {
        let d = working[a][b];
        connect(&mut adjacency, a, b, d);
    }

    let outgroup = earliest_sample(sequences);
    let root = match adjacency[outgroup].first() {
        Some(&(neighbor, length)) => {
            let mut counter = 0;
            let subtree = materialize_unrooted(&adjacency, neighbor, outgroup, length, sequences, &mut counter);
            let id = format!("node_{}", counter);
            TreeNode::internal(id, 0.0, TreeNode::leaf(sequences[outgroup].clone(), 0.0), subtree)
        }
        None => TreeNode::leaf(sequences[outgroup].clone(), 0.0),
    };

    Ok(PhylogeneticTree::from_root(root, clamped))
}

fn materialize_unrooted(
    adjacency: &[Vec<(usize, f64)>],
    node: usize,
    parent: usize,
    length: f64,
    sequences: &[DatedSequence],
    counter: &mut usize,
) -> TreeNode {
    if node < sequences.len() {
        return TreeNode::leaf(sequences[node].clone(), length);
    }
    let mut children: Vec<TreeNode> = adjacency[node]
        .iter()
        .filter(|&&(next, _)| next != parent)
        .map(|&(next, l)| materialize_unrooted(adjacency, next, node, l, sequences, counter))
        .collect();
    let id = format!("node_{}", *counter);
    *counter += 1;
    // Joined nodes have degree 3, so two children remain below the parent edge
    let right = children.pop();
    let left = children.pop();
    match (left, right) {
        (Some(left), Some(right)) => TreeNode::internal(id, length, left, right),
        (None, Some(only)) | (Some(only), None) => TreeNode { distance: only.distance + length, ..only },
        (None, None) => TreeNode { id, distance: length, height: 0.0, children: Vec::new(), sequence: None, dnds: None },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seqs(data: &[(&str, &str, f64)]) -> Vec<DatedSequence> {
        data.iter().map(|&(id, s, d)| DatedSequence::new(id, s, d)).collect()
    }

    fn check_heights(node: &TreeNode, parent_height: f64) {
        assert!((node.height - (parent_height + node.distance)).abs() < 1e-12);
        assert!(node.distance >= 0.0);
        for child in &node.children {
            check_heights(child, node.height);
        }
        if node.is_leaf() {
            assert!(node.sequence.is_some());
        } else {
            assert_eq!(node.children.len(), 2);
            assert!(node.sequence.is_none());
        }
    }

    fn monotone() -> Vec<DatedSequence> {
        seqs(&[
            ("s2020", "AAAAAAAAAA", 2020.0),
            ("s2021", "AAAAAAAAAC", 2021.0),
            ("s2022", "AAAAAAAACC", 2022.0),
            ("s2023", "AAAAAAAACT", 2023.0),
        ])
    }

    #[test]
    fn test_empty_input_is_error() {
        assert_eq!(build_tree(&[]).unwrap_err(), PhyloError::EmptyInput);
    }

    #[test]
    fn test_single_sequence_tree() {
        let tree = build_tree(&seqs(&[("only", "ACGT", 2020.0)])).unwrap();
        assert_eq!(tree.leaf_count, 1);
        assert!(tree.root.is_leaf());
        assert_eq!(tree.height, 0.0);
        assert_eq!(tree.root.id, "only");
        assert!(!tree.is_clock_calibrated);
    }

    #[test]
    fn test_identical_sequences_tree() {
        let input: Vec<_> = (0..4)
            .map(|i| DatedSequence::new(format!("s{}", i), "ACGTACGTAC", 2020.0))
            .collect();
        let tree = build_tree(&input).unwrap();
        assert_eq!(tree.leaf_count, 4);
        assert_eq!(tree.height, 0.0);
        assert_eq!(tree.root.node_count(), 7);
        check_heights(&tree.root, 0.0);
    }

    #[test]
    fn test_upgma_topology_and_heights() {
        let tree = build_tree(&monotone()).unwrap();
        assert_eq!(tree.leaf_count, 4);
        assert_eq!(tree.clamped_branches, 0);
        check_heights(&tree.root, 0.0);

        // (s2020,s2021) merge first, then (s2022,s2023)
        let first = tree.root.find("node_0").unwrap();
        let ids: Vec<_> = first.children.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["s2020", "s2021"]);
        let second = tree.root.find("node_1").unwrap();
        let ids: Vec<_> = second.children.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["s2022", "s2023"]);
        assert_eq!(tree.root.id, "node_2");

        // Ultrametric: every leaf sits at the same height
        let heights = tree.leaf_heights();
        for h in &heights {
            assert!((h - tree.height).abs() < 1e-12);
        }
    }

    #[test]
    fn test_upgma_uses_leaf_pair_averages() {
        let input = monotone();
        let matrix = compute_distance_matrix(&input, DistanceModel::Jc69).unwrap();
        let tree = build_upgma_tree(&input, &matrix, TieBreak::FirstPair).unwrap();
        // Root height (from leaves) is half the mean of the four cross-cluster distances
        let cross = (matrix.get(0, 2) + matrix.get(0, 3) + matrix.get(1, 2) + matrix.get(1, 3)) / 4.0;
        assert!((tree.height - cross / 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_tie_break_rules() {
        let input = monotone();
        let matrix = compute_distance_matrix(&input, DistanceModel::Jc69).unwrap();
        let first = build_upgma_tree(&input, &matrix, TieBreak::FirstPair).unwrap();
        let last = build_upgma_tree(&input, &matrix, TieBreak::LastPair).unwrap();
        let first_ids: Vec<_> = first.root.find("node_0").unwrap().children.iter().map(|c| c.id.clone()).collect();
        let last_ids: Vec<_> = last.root.find("node_0").unwrap().children.iter().map(|c| c.id.clone()).collect();
        assert_eq!(first_ids, vec!["s2020", "s2021"]);
        assert_eq!(last_ids, vec!["s2022", "s2023"]);
    }

    #[test]
    fn test_matrix_size_mismatch() {
        let input = monotone();
        let matrix = DistanceMatrix::zeros(vec!["a".to_string()]);
        let err = build_upgma_tree(&input, &matrix, TieBreak::FirstPair).unwrap_err();
        assert_eq!(err, PhyloError::MatrixSize { expected: 4, found: 1 });
    }

    #[test]
    fn test_nj_roots_on_earliest_sample() {
        let input = monotone();
        let matrix = compute_distance_matrix(&input, DistanceModel::Jc69).unwrap();
        let tree = build_nj_tree(&input, &matrix, TieBreak::FirstPair).unwrap();
        assert_eq!(tree.leaf_count, 4);
        check_heights(&tree.root, 0.0);
        assert_eq!(tree.root.children[0].id, "s2020");
        assert_eq!(tree.root.children[0].distance, 0.0);

        // Patristic distance from the earliest sample grows with date
        let mut tips: Vec<(String, f64)> = tree
            .root_to_tip_distances()
            .into_iter()
            .map(|(n, d)| (n.id.clone(), d))
            .collect();
        tips.sort_by(|a, b| a.0.cmp(&b.0));
        for pair in tips.windows(2) {
            assert!(pair[1].1 > pair[0].1);
        }
    }

    #[test]
    fn test_nj_two_sequences() {
        let input = seqs(&[("late", "AAAA", 2021.0), ("early", "AAAC", 2019.0)]);
        let matrix = compute_distance_matrix(&input, DistanceModel::Jc69).unwrap();
        let tree = build_nj_tree(&input, &matrix, TieBreak::FirstPair).unwrap();
        assert_eq!(tree.leaf_count, 2);
        assert_eq!(tree.root.children[0].id, "early");
        assert!((tree.root.children[1].distance - matrix.get(0, 1)).abs() < 1e-12);
    }

    #[test]
    fn test_nj_clamps_negative_branches() {
        // d(b,c) exceeds d(a,b) + d(a,c), so joining b and c leaves a negative edge
        let input = seqs(&[("a", "AAAA", 2019.0), ("b", "AAAA", 2020.0), ("c", "AAAA", 2021.0)]);
        let matrix = DistanceMatrix {
            ids: vec!["a".into(), "b".into(), "c".into()],
            values: vec![vec![0.0, 1.0, 1.0], vec![1.0, 0.0, 5.0], vec![1.0, 5.0, 0.0]],
        };
        let tree = build_nj_tree(&input, &matrix, TieBreak::FirstPair).unwrap();
        assert!(tree.clamped_branches >= 1);
        assert_eq!(tree.leaf_count, 3);
        check_heights(&tree.root, 0.0);
        assert_eq!(tree.root.children[0].id, "a");
        assert_eq!(tree.to_newick(), "(a:0,(b:2.5,c:2.5)node_0:0)node_1:0;");
    }

    #[test]
    fn test_newick_output() {
        let input = seqs(&[("a", "AAAA", 2020.0), ("b c", "AAAA", 2021.0)]);
        let tree = build_tree(&input).unwrap();
        assert_eq!(tree.to_newick(), "(a:0,'b c':0)node_0:0;");
    }

    #[test]
    fn test_method_parsing() {
        assert_eq!("nj".parse::<TreeMethod>().unwrap(), TreeMethod::NeighborJoining);
        assert_eq!("UPGMA".parse::<TreeMethod>().unwrap(), TreeMethod::Upgma);
        assert!("ml".parse::<TreeMethod>().is_err());
        assert_eq!("last".parse::<TieBreak>().unwrap(), TieBreak::LastPair);
    }
}
