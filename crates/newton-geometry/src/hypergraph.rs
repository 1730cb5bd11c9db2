// ─────────────────────────────────────────────────────────────────────
// Newton — Module Hypergraph (Architectural Topology)
// ─────────────────────────────────────────────────────────────────────
//! The architectural topology of the Newton system: ten modules in
//! four layers, directed verified channels between them, and
//! hyperedges for operations that span more than two modules.
//!
//! Routing a computation between modules means finding a path through
//! this structure; a missing channel is a hard error, not a fallback.

use std::collections::{BTreeSet, HashMap, HashSet, VecDeque};

use serde::Serialize;

use newton_types::{NewtonError, NewtonResult};

/// The fixed modules of the Newton architecture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NewtonModule {
    /// Policy enforcement.
    GlassBox,
    /// Adversarial-resistant statistics.
    Robust,
    /// Factual grounding.
    Ground,
    /// Constraint definition language.
    Cdl,
    /// Encrypted storage.
    Vault,
    /// Verification engine.
    Forge,
    /// Constraint-preserving text.
    Textgen,
    /// LLM compilation.
    Chatbot,
    /// Immutable audit trail.
    Ledger,
    /// Distributed consensus.
    Bridge,
}

impl NewtonModule {
    pub const ALL: [NewtonModule; 10] = [
        NewtonModule::GlassBox,
        NewtonModule::Robust,
        NewtonModule::Ground,
        NewtonModule::Cdl,
        NewtonModule::Vault,
        NewtonModule::Forge,
        NewtonModule::Textgen,
        NewtonModule::Chatbot,
        NewtonModule::Ledger,
        NewtonModule::Bridge,
    ];

    pub fn layer(self) -> Layer {
        match self {
            NewtonModule::GlassBox => Layer::Policy,
            NewtonModule::Robust
            | NewtonModule::Ground
            | NewtonModule::Cdl
            | NewtonModule::Vault => Layer::Data,
            NewtonModule::Forge | NewtonModule::Textgen | NewtonModule::Chatbot => {
                Layer::Execution
            }
            NewtonModule::Ledger | NewtonModule::Bridge => Layer::Persistence,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            NewtonModule::GlassBox => "GLASS_BOX",
            NewtonModule::Robust => "ROBUST",
            NewtonModule::Ground => "GROUND",
            NewtonModule::Cdl => "CDL",
            NewtonModule::Vault => "VAULT",
            NewtonModule::Forge => "FORGE",
            NewtonModule::Textgen => "TEXTGEN",
            NewtonModule::Chatbot => "CHATBOT",
            NewtonModule::Ledger => "LEDGER",
            NewtonModule::Bridge => "BRIDGE",
        }
    }
}

impl std::fmt::Display for NewtonModule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The four architectural layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Layer {
    Policy,
    Data,
    Execution,
    Persistence,
}

impl Layer {
    pub const ALL: [Layer; 4] = [
        Layer::Policy,
        Layer::Data,
        Layer::Execution,
        Layer::Persistence,
    ];
}

/// What kind of traffic a channel carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ChannelType {
    Data,
    Control,
    Verification,
    Audit,
    Sync,
}

/// A verified channel between two modules.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Channel {
    pub source: NewtonModule,
    pub target: NewtonModule,
    pub channel_type: ChannelType,
    pub bidirectional: bool,
    pub description: &'static str,
}

impl Channel {
    pub fn new(
        source: NewtonModule,
        target: NewtonModule,
        channel_type: ChannelType,
        description: &'static str,
    ) -> Self {
        Self {
            source,
            target,
            channel_type,
            bidirectional: false,
            description,
        }
    }

    pub fn id(&self) -> String {
        let direction = if self.bidirectional { "<->" } else { "->" };
        format!("{}{direction}{}", self.source, self.target)
    }
}

/// A hyperedge: one operation spanning two or more modules.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HyperEdge {
    pub id: String,
    pub modules: BTreeSet<NewtonModule>,
    pub operation: String,
    pub description: String,
}

impl HyperEdge {
    pub fn new(
        id: impl Into<String>,
        modules: impl IntoIterator<Item = NewtonModule>,
        operation: impl Into<String>,
        description: impl Into<String>,
    ) -> NewtonResult<Self> {
        let modules: BTreeSet<NewtonModule> = modules.into_iter().collect();
        if modules.len() < 2 {
            return Err(NewtonError::Validation(
                "hyperedge must connect at least 2 modules".to_string(),
            ));
        }
        Ok(Self {
            id: id.into(),
            modules,
            operation: operation.into(),
            description: description.into(),
        })
    }

    pub fn involves(&self, module: NewtonModule) -> bool {
        self.modules.contains(&module)
    }
}

/// Summary of the hypergraph topology, serializable for audit output.
#[derive(Debug, Clone, Serialize)]
pub struct TopologySummary {
    pub modules: usize,
    pub channels: usize,
    pub hyperedges: usize,
    pub layers: HashMap<Layer, Vec<NewtonModule>>,
    pub is_connected: bool,
}

/// The complete module hypergraph.
#[derive(Debug, Clone)]
pub struct ModuleHypergraph {
    channels: Vec<Channel>,
    hyperedges: Vec<HyperEdge>,
    adjacency: HashMap<NewtonModule, BTreeSet<NewtonModule>>,
}

impl ModuleHypergraph {
    /// An empty hypergraph over the fixed module set.
    pub fn empty() -> Self {
        Self {
            channels: Vec::new(),
            hyperedges: Vec::new(),
            adjacency: NewtonModule::ALL
                .iter()
                .map(|&m| (m, BTreeSet::new()))
                .collect(),
        }
    }

    /// The standard Newton architecture.
    pub fn default_architecture() -> Self {
        let mut graph = Self::empty();

        graph.add_channel(Channel::new(
            NewtonModule::GlassBox,
            NewtonModule::Cdl,
            ChannelType::Control,
            "Policy constraints flow to CDL",
        ));
        graph.add_channel(Channel::new(
            NewtonModule::Robust,
            NewtonModule::Ground,
            ChannelType::Data,
            "Statistical validation to grounding",
        ));
        graph.add_channel(Channel::new(
            NewtonModule::Ground,
            NewtonModule::Cdl,
            ChannelType::Data,
            "Grounded facts to constraints",
        ));
        graph.add_channel(Channel::new(
            NewtonModule::Vault,
            NewtonModule::Cdl,
            ChannelType::Data,
            "Stored data for constraint evaluation",
        ));

        for (target, description) in [
            (NewtonModule::Forge, "Constraints to FORGE"),
            (NewtonModule::Textgen, "Constraints to TEXTGEN"),
            (NewtonModule::Chatbot, "Constraints to CHATBOT"),
        ] {
            graph.add_channel(Channel::new(
                NewtonModule::Cdl,
                target,
                ChannelType::Control,
                description,
            ));
        }

        for (source, description) in [
            (NewtonModule::Forge, "FORGE audit to ledger"),
            (NewtonModule::Textgen, "TEXTGEN audit to ledger"),
            (NewtonModule::Chatbot, "CHATBOT audit to ledger"),
        ] {
            graph.add_channel(Channel::new(
                source,
                NewtonModule::Ledger,
                ChannelType::Audit,
                description,
            ));
        }

        graph.add_channel(Channel::new(
            NewtonModule::Ledger,
            NewtonModule::Bridge,
            ChannelType::Sync,
            "Ledger sync to distributed consensus",
        ));

        // Multi-module operations. These constructions are static and
        // always have at least two modules, so the errors are
        // unreachable and dropped.
        let edges = [
            HyperEdge::new(
                "constraint_evaluation",
                [NewtonModule::Cdl, NewtonModule::Forge, NewtonModule::Ground],
                "evaluate",
                "Constraint evaluation requires CDL, FORGE, and GROUND",
            ),
            HyperEdge::new(
                "text_generation",
                [NewtonModule::Cdl, NewtonModule::Textgen, NewtonModule::Vault],
                "generate",
                "Text generation requires CDL, TEXTGEN, and VAULT",
            ),
            HyperEdge::new(
                "full_pipeline",
                [
                    NewtonModule::GlassBox,
                    NewtonModule::Cdl,
                    NewtonModule::Forge,
                    NewtonModule::Ledger,
                ],
                "execute",
                "Full verification pipeline",
            ),
        ];
        for edge in edges.into_iter().flatten() {
            graph.add_hyperedge(edge);
        }

        graph
    }

    pub fn add_channel(&mut self, channel: Channel) {
        self.adjacency
            .entry(channel.source)
            .or_default()
            .insert(channel.target);
        if channel.bidirectional {
            self.adjacency
                .entry(channel.target)
                .or_default()
                .insert(channel.source);
        }
        self.channels.push(channel);
    }

    pub fn add_hyperedge(&mut self, hyperedge: HyperEdge) {
        self.hyperedges.push(hyperedge);
    }

    pub fn channels(&self) -> &[Channel] {
        &self.channels
    }

    pub fn hyperedges(&self) -> &[HyperEdge] {
        &self.hyperedges
    }

    pub fn neighbors(&self, module: NewtonModule) -> BTreeSet<NewtonModule> {
        self.adjacency.get(&module).cloned().unwrap_or_default()
    }

    pub fn channels_from(&self, module: NewtonModule) -> Vec<&Channel> {
        self.channels.iter().filter(|c| c.source == module).collect()
    }

    pub fn channels_to(&self, module: NewtonModule) -> Vec<&Channel> {
        self.channels.iter().filter(|c| c.target == module).collect()
    }

    pub fn layer_modules(&self, layer: Layer) -> BTreeSet<NewtonModule> {
        NewtonModule::ALL
            .iter()
            .copied()
            .filter(|m| m.layer() == layer)
            .collect()
    }

    /// Shortest directed path from source to target, if one exists.
    pub fn path_exists(
        &self,
        source: NewtonModule,
        target: NewtonModule,
    ) -> Option<Vec<NewtonModule>> {
        if source == target {
            return Some(vec![source]);
        }

        let mut visited: HashSet<NewtonModule> = HashSet::from([source]);
        let mut queue: VecDeque<Vec<NewtonModule>> = VecDeque::from([vec![source]]);

        while let Some(path) = queue.pop_front() {
            let current = *path.last()?;
            for &neighbor in self.adjacency.get(&current)? {
                if neighbor == target {
                    let mut found = path.clone();
                    found.push(neighbor);
                    return Some(found);
                }
                if visited.insert(neighbor) {
                    let mut next = path.clone();
                    next.push(neighbor);
                    queue.push_back(next);
                }
            }
        }
        None
    }

    pub fn hyperedges_for(&self, module: NewtonModule) -> Vec<&HyperEdge> {
        self.hyperedges
            .iter()
            .filter(|h| h.involves(module))
            .collect()
    }

    /// Weak connectivity: every module reachable from every other when
    /// channel direction is ignored.
    pub fn is_connected(&self) -> bool {
        let mut undirected: HashMap<NewtonModule, BTreeSet<NewtonModule>> = NewtonModule::ALL
            .iter()
            .map(|&m| (m, BTreeSet::new()))
            .collect();
        for channel in &self.channels {
            undirected.entry(channel.source).or_default().insert(channel.target);
            undirected.entry(channel.target).or_default().insert(channel.source);
        }

        let start = NewtonModule::ALL[0];
        let mut visited: HashSet<NewtonModule> = HashSet::from([start]);
        let mut queue = VecDeque::from([start]);
        while let Some(current) = queue.pop_front() {
            if let Some(neighbors) = undirected.get(&current) {
                for &neighbor in neighbors {
                    if visited.insert(neighbor) {
                        queue.push_back(neighbor);
                    }
                }
            }
        }
        visited.len() == NewtonModule::ALL.len()
    }

    /// Confirm a direct channel exists from source to target.
    pub fn verify_channel(
        &self,
        source: NewtonModule,
        target: NewtonModule,
    ) -> NewtonResult<&Channel> {
        self.channels
            .iter()
            .find(|c| c.source == source && c.target == target)
            .ok_or_else(|| NewtonError::Channel {
                from_module: source.to_string(),
                to_module: target.to_string(),
            })
    }

    pub fn summary(&self) -> TopologySummary {
        TopologySummary {
            modules: NewtonModule::ALL.len(),
            channels: self.channels.len(),
            hyperedges: self.hyperedges.len(),
            layers: Layer::ALL
                .iter()
                .map(|&l| (l, self.layer_modules(l).into_iter().collect()))
                .collect(),
            is_connected: self.is_connected(),
        }
    }
}

impl Default for ModuleHypergraph {
    fn default() -> Self {
        Self::default_architecture()
    }
}
