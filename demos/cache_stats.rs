//! Cache statistics for a synthetic operation workload.
//!
//! The workload replays random apply/ite/quantify/replace calls with a
//! configurable amount of key reuse and prints the cache dump afterwards.
//!
//! Run with:
//! ```bash
//! cargo run --example cache_stats -- --nodes 100000 --reuse 0.6
//! ```

use std::time::Instant;

use bdd_opcache::cache::{BinOp, QuantKind};
use bdd_opcache::config::CacheConfig;
use bdd_opcache::manager::{CacheManager, Epoch};
use bdd_opcache::node::{Node, NodeTable};
use bdd_opcache::reference::NodeId;
use bdd_opcache::types::Level;
use clap::Parser;
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

#[derive(Debug, Parser)]
#[command(author, version, about = "Cache statistics for a synthetic BDD workload")]
struct Cli {
    /// Size of the simulated node table (ids must fit a non-negative i32)
    #[arg(long, default_value = "100000", value_parser = clap::value_parser!(u32).range(2..=i32::MAX as i64))]
    nodes: u32,

    /// Slots per cache (default: nodes / 4 + 1)
    #[arg(long)]
    cache_size: Option<usize>,

    /// Nodes per cache slot on resize (0 = fixed size)
    #[arg(long, default_value = "0")]
    ratio: usize,

    /// Operations per cache
    #[arg(long, default_value = "200000")]
    ops: usize,

    /// Probability of repeating a recent key
    #[arg(long, default_value = "0.5")]
    reuse: f64,

    /// Number of garbage collections to simulate
    #[arg(long, default_value = "2")]
    collections: usize,
}

/// Node table containing only the variable-set chain `{0, 2, 4, ...}`.
struct Chain {
    nodes: Vec<Node>,
    vars: usize,
}

impl Chain {
    fn new(vars: usize) -> Self {
        let mut nodes = vec![Node::default(); 2];
        let mut head = NodeId::ONE;
        for level in (0..vars).step_by(2).rev() {
            nodes.push(Node::new(Level::new(level), NodeId::ZERO, head));
            head = NodeId::new(nodes.len() as u32 - 1);
        }
        Self { nodes, vars }
    }

    fn head(&self) -> NodeId {
        NodeId::new(self.nodes.len() as u32 - 1)
    }
}

impl NodeTable for Chain {
    fn node_count(&self) -> usize {
        self.nodes.len()
    }

    fn var_count(&self) -> usize {
        self.vars
    }

    fn node(&self, id: NodeId) -> Node {
        self.nodes[id.index()]
    }
}

/// Random node ids with temporal locality.
struct Keys {
    rng: ChaCha8Rng,
    recent: Vec<NodeId>,
    nodes: u32,
    reuse: f64,
}

impl Keys {
    fn next(&mut self) -> NodeId {
        if !self.recent.is_empty() && self.rng.random_bool(self.reuse) {
            let i = self.rng.random_range(0..self.recent.len());
            return self.recent[i];
        }
        let id = NodeId::new(self.rng.random_range(0..self.nodes));
        if self.recent.len() < 64 {
            self.recent.push(id);
        } else {
            let i = self.rng.random_range(0..self.recent.len());
            self.recent[i] = id;
        }
        id
    }
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    simplelog::TermLogger::init(
        simplelog::LevelFilter::Info,
        simplelog::Config::default(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )?;

    let cli = Cli::parse();
    println!("args = {:?}", cli);

    let mut config = CacheConfig::default().with_cache_ratio(cli.ratio);
    if let Some(size) = cli.cache_size {
        config = config.with_cache_size(size);
    }
    let mut manager = CacheManager::new(config, cli.nodes as usize)?;
    let chain = Chain::new(16);
    let mut keys = Keys {
        rng: ChaCha8Rng::seed_from_u64(42),
        recent: Vec::new(),
        nodes: cli.nodes,
        reuse: cli.reuse.clamp(0.0, 1.0),
    };

    println!(
        "{:>6} {:>10} {:>10} {:>10} {:>10} {:>10} {:>10}",
        "Round", "Time (ms)", "Apply", "ITE", "Quant", "AppEx", "Replace"
    );

    let mut epoch = Epoch::INITIAL;
    let mut node_count = cli.nodes as usize;
    for round in 0..=cli.collections {
        let start = Instant::now();
        manager.register_varset(&chain, chain.head())?;
        let pairing = manager.new_pairing();
        let session = manager.session(epoch)?;

        let op = BinOp::ALL[round % BinOp::ALL.len()];
        let mut apply = session.apply.scope(op);
        let mut quant = session.quant.scope(QuantKind::Exist, session.varset);
        let mut appex = session.appex.scope(BinOp::And, QuantKind::Exist, session.varset);
        let mut replace = session.replace.scope(pairing);

        for _ in 0..cli.ops {
            let (a, b, c) = (keys.next(), keys.next(), keys.next());
            if apply.lookup(a, b).is_none() {
                apply.insert(a, b, c);
            }
            if apply.lookup_not(a).is_none() {
                apply.insert_not(a, b);
            }
            if session.ite.lookup(a, b, c).is_none() {
                session.ite.insert(a, b, c, a);
            }
            if quant.lookup(a, chain.head()).is_none() {
                quant.insert(a, chain.head(), b);
            }
            if appex.lookup(a, b).is_none() {
                appex.insert(a, b, c);
            }
            if replace.lookup(a).is_none() {
                replace.insert(a, c);
            }
        }

        println!(
            "{:>6} {:>10} {:>9.1}% {:>9.1}% {:>9.1}% {:>9.1}% {:>9.1}%",
            round,
            start.elapsed().as_millis(),
            manager.apply().table().stats().hit_rate() * 100.0,
            manager.ite().table().stats().hit_rate() * 100.0,
            manager.quant().table().stats().hit_rate() * 100.0,
            manager.appex().table().stats().hit_rate() * 100.0,
            manager.replace().table().stats().hit_rate() * 100.0,
        );

        // Garbage collection: the node table grows and ids get reassigned.
        epoch = epoch.next();
        node_count += node_count / 2;
        manager.resize_all(node_count, epoch)?;
    }

    println!();
    print!("{}", manager);
    Ok(())
}
