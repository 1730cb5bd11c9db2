// ─────────────────────────────────────────────────────────────────────
// Newton — Computation Graph (Deterministic Routing)
// ─────────────────────────────────────────────────────────────────────
//! The deterministic finite automaton routing request types to
//! decision nodes. Every input has exactly one path: no branching,
//! no backtracking, and every traversal is bounded.
//!
//! Node identifiers follow the `request_HARMFUL` / `decision_REFUSE`
//! / `stage_CLASSIFY` convention so audit paths are self-describing.

use std::collections::{HashMap, HashSet};

use serde::Serialize;

use newton_types::{Decision, NewtonError, NewtonResult, ProcessingStage, RequestType};

/// Hard cap on routing steps. The default graph needs two; anything
/// approaching the cap is a malformed custom graph.
const MAX_ROUTING_STEPS: usize = 100;

/// What a graph node stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NodePayload {
    Request(RequestType),
    Stage(ProcessingStage),
    Decision(Decision),
}

/// A node in the computation graph.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphNode {
    pub id: String,
    pub payload: NodePayload,
}

impl GraphNode {
    pub fn request(request_type: RequestType) -> Self {
        Self {
            id: format!("request_{}", request_type.as_str()),
            payload: NodePayload::Request(request_type),
        }
    }

    pub fn stage(stage: ProcessingStage) -> Self {
        Self {
            id: format!("stage_{}", stage.as_str()),
            payload: NodePayload::Stage(stage),
        }
    }

    pub fn decision(decision: Decision) -> Self {
        Self {
            id: format!("decision_{}", decision.as_str()),
            payload: NodePayload::Decision(decision),
        }
    }
}

/// A directed transition between two nodes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphEdge {
    pub source: String,
    pub target: String,
    pub condition: String,
    pub weight: f64,
}

impl GraphEdge {
    pub fn always(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            condition: "always".to_string(),
            weight: 1.0,
        }
    }

    pub fn conditional(
        source: impl Into<String>,
        target: impl Into<String>,
        condition: impl Into<String>,
    ) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            condition: condition.into(),
            weight: 1.0,
        }
    }
}

/// The outcome of one traversal: the audit path and the decision it
/// terminated on.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PathResult {
    pub path: Vec<String>,
    pub decision: Decision,
    pub stages_completed: Vec<ProcessingStage>,
}

impl PathResult {
    pub fn length(&self) -> usize {
        self.path.len()
    }
}

/// The deterministic computation graph.
///
/// A graph built with [`ComputationGraph::default_graph`] is complete
/// by construction; custom graphs built with [`ComputationGraph::new`]
/// are checked harder during routing, since a missing route there is
/// a configuration error rather than a recoverable condition.
#[derive(Debug, Clone)]
pub struct ComputationGraph {
    nodes: HashMap<String, GraphNode>,
    edges: Vec<GraphEdge>,
    adjacency: HashMap<String, Vec<usize>>,
    is_default: bool,
}

impl ComputationGraph {
    /// An empty custom graph.
    pub fn new() -> Self {
        Self {
            nodes: HashMap::new(),
            edges: Vec::new(),
            adjacency: HashMap::new(),
            is_default: false,
        }
    }

    /// The standard routing graph: every request type wired to its
    /// decision, plus the linear six-stage pipeline.
    pub fn default_graph() -> Self {
        let mut graph = Self::new();
        graph.is_default = true;

        for decision in Decision::ALL {
            graph.add_node(GraphNode::decision(decision));
        }
        for request_type in RequestType::ALL {
            graph.add_node(GraphNode::request(request_type));
        }
        for stage in ProcessingStage::PIPELINE {
            graph.add_node(GraphNode::stage(stage));
        }

        for request_type in RequestType::ALL {
            graph.add_edge(GraphEdge::always(
                format!("request_{}", request_type.as_str()),
                format!("decision_{}", request_type.default_decision().as_str()),
            ));
        }

        for pair in ProcessingStage::PIPELINE.windows(2) {
            graph.add_edge(GraphEdge::always(
                format!("stage_{}", pair[0].as_str()),
                format!("stage_{}", pair[1].as_str()),
            ));
        }

        graph
    }

    pub fn add_node(&mut self, node: GraphNode) {
        self.adjacency.entry(node.id.clone()).or_default();
        self.nodes.insert(node.id.clone(), node);
    }

    pub fn add_edge(&mut self, edge: GraphEdge) {
        let index = self.edges.len();
        self.adjacency
            .entry(edge.source.clone())
            .or_default()
            .push(index);
        self.edges.push(edge);
    }

    pub fn node(&self, id: &str) -> Option<&GraphNode> {
        self.nodes.get(id)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn outgoing_edges(&self, id: &str) -> Vec<&GraphEdge> {
        self.adjacency
            .get(id)
            .map(|indices| indices.iter().map(|&i| &self.edges[i]).collect())
            .unwrap_or_default()
    }

    /// Route a classified request to its decision.
    ///
    /// The walk takes the first outgoing edge at each node (the DFA
    /// property guarantees it is the only one), fails on cycles and on
    /// traversals exceeding the step cap, and on a dead end either
    /// falls back to the request type's default decision (default
    /// graph) or fails (custom graph).
    pub fn classify_and_route(&self, request_type: RequestType) -> NewtonResult<PathResult> {
        let start = format!("request_{}", request_type.as_str());
        if !self.nodes.contains_key(&start) {
            return Err(NewtonError::Graph(format!(
                "no node for request type {request_type}"
            )));
        }

        let mut path = vec![start.clone()];
        let mut visited: HashSet<String> = HashSet::from([start.clone()]);
        let mut current = start;

        for _ in 0..MAX_ROUTING_STEPS {
            let node = self
                .nodes
                .get(&current)
                .ok_or_else(|| NewtonError::Graph(format!("edge into unknown node {current}")))?;

            if let NodePayload::Decision(decision) = node.payload {
                return Ok(PathResult {
                    path,
                    decision,
                    stages_completed: Vec::new(),
                });
            }

            let edges = self.outgoing_edges(&current);
            let Some(edge) = edges.first() else {
                if self.is_default {
                    log::warn!(
                        "dead end at {current} while routing {request_type}; \
                         using default decision"
                    );
                    return Ok(PathResult {
                        path,
                        decision: request_type.default_decision(),
                        stages_completed: Vec::new(),
                    });
                }
                return Err(NewtonError::Graph(format!(
                    "dead end at {current}: no outgoing edges and no decision reached"
                )));
            };

            current = edge.target.clone();
            if !visited.insert(current.clone()) {
                return Err(NewtonError::Graph(format!("cycle detected at {current}")));
            }
            path.push(current.clone());
        }

        Err(NewtonError::Graph(format!(
            "routing exceeded {MAX_ROUTING_STEPS} steps without reaching a decision"
        )))
    }

    /// Walk the linear processing pipeline, recording every stage.
    pub fn process_through_pipeline(&self) -> PathResult {
        let mut path = Vec::with_capacity(ProcessingStage::PIPELINE.len());
        let mut stages_completed = Vec::with_capacity(ProcessingStage::PIPELINE.len());
        for stage in ProcessingStage::PIPELINE {
            path.push(format!("stage_{}", stage.as_str()));
            stages_completed.push(stage);
        }
        PathResult {
            path,
            decision: Decision::Answer,
            stages_completed,
        }
    }

    /// True if no node has two outgoing edges with the same condition.
    pub fn is_deterministic(&self) -> bool {
        for indices in self.adjacency.values() {
            let mut seen = HashSet::new();
            for &i in indices {
                if !seen.insert(self.edges[i].condition.as_str()) {
                    return false;
                }
            }
        }
        true
    }

    /// True if every request type routes to a decision.
    pub fn is_complete(&self) -> bool {
        RequestType::ALL
            .iter()
            .all(|&rt| self.classify_and_route(rt).is_ok())
    }
}

impl Default for ComputationGraph {
    fn default() -> Self {
        Self::default_graph()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_harmful_routes_to_refuse() {
        let graph = ComputationGraph::default_graph();
        let result = graph.classify_and_route(RequestType::Harmful).unwrap();
        assert_eq!(result.decision, Decision::Refuse);
        assert_eq!(result.path, vec!["request_HARMFUL", "decision_REFUSE"]);
    }

    #[test]
    fn test_all_request_types_route_to_default_decision() {
        let graph = ComputationGraph::default_graph();
        for rt in RequestType::ALL {
            let result = graph.classify_and_route(rt).unwrap();
            assert_eq!(result.decision, rt.default_decision(), "{rt}");
            assert_eq!(result.length(), 2);
        }
    }

    #[test]
    fn test_routing_is_deterministic() {
        let graph = ComputationGraph::default_graph();
        let a = graph.classify_and_route(RequestType::Question).unwrap();
        let b = graph.classify_and_route(RequestType::Question).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_default_graph_is_deterministic_and_complete() {
        let graph = ComputationGraph::default_graph();
        assert!(graph.is_deterministic());
        assert!(graph.is_complete());
    }

    #[test]
    fn test_duplicate_condition_breaks_determinism() {
        let mut graph = ComputationGraph::default_graph();
        graph.add_edge(GraphEdge::always("request_HARMFUL", "decision_ANSWER"));
        assert!(!graph.is_deterministic());
    }

    #[test]
    fn test_custom_graph_dead_end_fails() {
        let mut graph = ComputationGraph::new();
        graph.add_node(GraphNode::request(RequestType::Question));
        let err = graph.classify_and_route(RequestType::Question).unwrap_err();
        assert!(err.to_string().contains("dead end"));
    }

    #[test]
    fn test_custom_graph_missing_start_fails() {
        let graph = ComputationGraph::new();
        assert!(graph.classify_and_route(RequestType::Harmful).is_err());
    }

    #[test]
    fn test_cycle_detection() {
        let mut graph = ComputationGraph::new();
        graph.add_node(GraphNode::request(RequestType::Question));
        graph.add_node(GraphNode::stage(ProcessingStage::Classify));
        graph.add_node(GraphNode::stage(ProcessingStage::Type));
        graph.add_edge(GraphEdge::always("request_QUESTION", "stage_CLASSIFY"));
        graph.add_edge(GraphEdge::always("stage_CLASSIFY", "stage_TYPE"));
        graph.add_edge(GraphEdge::always("stage_TYPE", "stage_CLASSIFY"));

        let err = graph.classify_and_route(RequestType::Question).unwrap_err();
        assert!(err.to_string().contains("cycle"));
    }

    #[test]
    fn test_multi_hop_custom_route() {
        let mut graph = ComputationGraph::new();
        graph.add_node(GraphNode::request(RequestType::Code));
        graph.add_node(GraphNode::stage(ProcessingStage::Risk));
        graph.add_node(GraphNode::decision(Decision::Answer));
        graph.add_edge(GraphEdge::always("request_CODE", "stage_RISK"));
        graph.add_edge(GraphEdge::always("stage_RISK", "decision_ANSWER"));

        let result = graph.classify_and_route(RequestType::Code).unwrap();
        assert_eq!(result.decision, Decision::Answer);
        assert_eq!(
            result.path,
            vec!["request_CODE", "stage_RISK", "decision_ANSWER"]
        );
    }

    #[test]
    fn test_pipeline_covers_all_stages() {
        let graph = ComputationGraph::default_graph();
        let result = graph.process_through_pipeline();
        assert_eq!(result.stages_completed.len(), 6);
        assert_eq!(result.path[0], "stage_CLASSIFY");
        assert_eq!(result.path[5], "stage_OUTPUT");
    }

    #[test]
    fn test_outgoing_edges() {
        let graph = ComputationGraph::default_graph();
        let edges = graph.outgoing_edges("request_HARMFUL");
        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0].target, "decision_REFUSE");
        assert!(graph.outgoing_edges("decision_REFUSE").is_empty());
    }
}
