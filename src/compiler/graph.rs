/*!
 * Program Graph
 * Resolved program description handed over by the front end
 */

use super::options::{ProgramOptions, StateOptions};
use crate::core::errors::{GraphError, GraphResult};
use crate::core::pv_type::PvTypeTag;
use crate::core::types::{ChanId, EvFlagId, QueueIndex, SsId};
use ahash::AHashSet;
use serde::{Deserialize, Serialize};

/// Whole-program input to table generation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgramGraph {
    pub name: String,
    /// Program parameter string, empty if none
    #[serde(default)]
    pub param: String,
    #[serde(default)]
    pub options: ProgramOptions,
    /// Size of the reentrant variable block; only emitted with the `reent` option
    #[serde(default)]
    pub var_size: usize,
    #[serde(default)]
    pub has_entry: bool,
    #[serde(default)]
    pub has_exit: bool,
    /// Event flags in declaration order; flag `n` is `event_flags[n - 1]`
    #[serde(default)]
    pub event_flags: Vec<EvFlagDecl>,
    #[serde(default)]
    pub channels: Vec<ChanDecl>,
    pub state_sets: Vec<StateSetDecl>,
    /// Number of distinct shared queues
    #[serde(default)]
    pub num_queues: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvFlagDecl {
    pub name: String,
    #[serde(default)]
    pub initial: bool,
}

/// Where a monitor declaration applies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MonitorScope {
    /// Declared at program level: every state set monitors the channel
    Program,
    /// Declared inside one state set
    StateSet(SsId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueDecl {
    pub size: usize,
    pub index: QueueIndex,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChanDecl {
    /// Variable expression the channel is bound to
    pub var_name: String,
    /// External name expression; `None` for anonymous channels
    #[serde(default)]
    pub pv_name: Option<String>,
    /// Offset of the variable in the program's storage
    #[serde(default)]
    pub val_offset: usize,
    pub type_tag: PvTypeTag,
    #[serde(default = "default_count")]
    pub count: usize,
    #[serde(default)]
    pub sync_flag: Option<EvFlagId>,
    #[serde(default)]
    pub monitors: Vec<MonitorScope>,
    #[serde(default)]
    pub queue: Option<QueueDecl>,
}

fn default_count() -> usize {
    1
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateSetDecl {
    pub name: String,
    pub states: Vec<StateDecl>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateDecl {
    pub name: String,
    #[serde(default)]
    pub has_entry: bool,
    #[serde(default)]
    pub has_exit: bool,
    #[serde(default)]
    pub options: StateOptions,
}

impl ProgramGraph {
    pub fn num_event_flags(&self) -> usize {
        self.event_flags.len()
    }

    pub fn num_channels(&self) -> usize {
        self.channels.len()
    }

    pub fn num_state_sets(&self) -> usize {
        self.state_sets.len()
    }

    /// Reject graphs the generator cannot encode
    pub fn validate(&self) -> GraphResult<()> {
        let mut names = AHashSet::with_capacity(self.state_sets.len());
        for ss in &self.state_sets {
            if !names.insert(ss.name.as_str()) {
                return Err(GraphError::DuplicateStateSet(ss.name.clone()));
            }
        }

        for (n, chan) in self.channels.iter().enumerate() {
            let chan_id = ChanId(n as u32);

            for scope in &chan.monitors {
                if let MonitorScope::StateSet(ss) = *scope {
                    if ss.index() >= self.state_sets.len() {
                        return Err(GraphError::UnknownStateSet { chan: chan_id, ss });
                    }
                }
            }

            if let Some(ef) = chan.sync_flag {
                if ef.get() == 0 || ef.get() as usize > self.event_flags.len() {
                    return Err(GraphError::UnknownEventFlag {
                        chan: chan_id,
                        ef: ef.get(),
                    });
                }
            }

            if let Some(queue) = chan.queue {
                if queue.index.index() >= self.num_queues {
                    return Err(GraphError::UnknownQueue {
                        chan: chan_id,
                        index: queue.index,
                        num_queues: self.num_queues,
                    });
                }
                if queue.size == 0 {
                    return Err(GraphError::EmptyQueue { chan: chan_id });
                }
            }
        }

        Ok(())
    }
}
