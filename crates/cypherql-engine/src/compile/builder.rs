//! Statement Builder: per-compile construction state.
//!
//! A statement is assembled from three parts that are only joined at the
//! end: match clauses in insertion order, projection frames in traversal
//! pre-order, and the parameter table. Frames are emitted innermost-first
//! because a parent's projection references the variable each child frame
//! rebinds.

use indexmap::IndexMap;
use serde_json::Value;
use smallvec::SmallVec;

/// How a frame's content is closed into the statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Closing {
    /// The root frame, closed by the final `RETURN`.
    Root {
        /// Wrap the projection in `collect(...)`.
        array: bool,
        /// Slice the collected list.
        limit: Option<u64>,
        /// Append `LIMIT 1` to a singular projection.
        limit_one: bool,
    },
    /// `collect({...}) AS var`, optionally sliced.
    Array {
        /// Slice the collected list.
        limit: Option<u64>,
    },
    /// `{...} AS var`
    Object,
}

#[derive(Debug)]
struct Frame {
    carry_over: String,
    entries: Vec<String>,
    closing: Closing,
}

/// A variable that must stay visible between the frame producing it and
/// the frame consuming it.
#[derive(Debug)]
struct Thread {
    var: String,
    consumer: usize,
    /// `None` when produced by a match clause rather than a frame.
    producer: Option<usize>,
}

/// Mutable construction context for one compile. Never shared.
#[derive(Debug, Default)]
pub(crate) struct StatementBuilder {
    matches: Vec<String>,
    frames: Vec<Frame>,
    threads: Vec<Thread>,
    scope: Vec<String>,
    parameters: IndexMap<String, Value>,
}

impl StatementBuilder {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Appends a match (or other reading/writing) clause.
    pub(crate) fn push_match(&mut self, clause: impl Into<String>) {
        let clause = clause.into();
        tracing::trace!(%clause, "match clause");
        self.matches.push(clause);
    }

    /// Inserts a clause at a given position among the match clauses.
    pub(crate) fn insert_match(&mut self, at: usize, clause: impl Into<String>) {
        self.matches.insert(at, clause.into());
    }

    pub(crate) fn match_count(&self) -> usize {
        self.matches.len()
    }

    /// Opens a frame whose rows are bound to `carry_over`, returning its index.
    pub(crate) fn open_frame(&mut self, carry_over: &str, closing: Closing) -> usize {
        tracing::trace!(carry_over, index = self.frames.len(), "frame");
        self.frames.push(Frame {
            carry_over: carry_over.to_string(),
            entries: Vec::new(),
            closing,
        });
        self.bind_scope(carry_over);
        self.frames.len() - 1
    }

    /// Adds `key: expr` to a frame's projection.
    pub(crate) fn project(&mut self, frame: usize, key: &str, expr: &str) {
        if let Some(f) = self.frames.get_mut(frame) {
            f.entries.push(format!("{key}: {expr}"));
        }
    }

    /// Records a variable as bound for the rest of the match phase.
    pub(crate) fn bind_scope(&mut self, var: &str) {
        if !self.scope.iter().any(|v| v == var) {
            self.scope.push(var.to_string());
        }
    }

    /// Variables bound so far, in binding order.
    pub(crate) fn scope(&self) -> &[String] {
        &self.scope
    }

    /// Keeps `var` in scope on every frame strictly between `consumer` and
    /// `producer` (or every frame after `consumer` if it comes from a match
    /// clause).
    pub(crate) fn thread(&mut self, var: &str, consumer: usize, producer: Option<usize>) {
        self.threads.push(Thread {
            var: var.to_string(),
            consumer,
            producer,
        });
    }

    /// Binds a parameter, returning the name it was bound under.
    ///
    /// A name already bound to a different value gets a numeric suffix, so
    /// distinct arguments never share a parameter.
    pub(crate) fn bind_param(&mut self, name: &str, value: Value) -> String {
        let mut candidate = name.to_string();
        let mut n = 1;
        while let Some(existing) = self.parameters.get(&candidate) {
            if *existing == value {
                return candidate;
            }
            n += 1;
            candidate = format!("{name}_{n}");
        }
        self.parameters.insert(candidate.clone(), value);
        candidate
    }

    /// Renders the statement: match clauses, the `WITH` chain innermost
    /// first, then the root `RETURN`.
    pub(crate) fn finish(self) -> (String, IndexMap<String, Value>) {
        let mut lines = self.matches.clone();

        for j in (1..self.frames.len()).rev() {
            let mut vars: SmallVec<[&str; 8]> = SmallVec::new();
            let lower = self.frames[..j].iter().map(|f| f.carry_over.as_str());
            let threaded = self
                .threads
                .iter()
                .filter(|t| t.consumer < j && t.producer.is_none_or(|k| j < k))
                .map(|t| t.var.as_str());
            for var in lower.chain(threaded) {
                if !vars.contains(&var) {
                    vars.push(var);
                }
            }

            let frame = &self.frames[j];
            let body = format!("{{{}}}", frame.entries.join(", "));
            let closed = match frame.closing {
                Closing::Array { limit: Some(n) } => {
                    format!("collect({body})[..{n}] AS {}", frame.carry_over)
                }
                Closing::Array { limit: None } => format!("collect({body}) AS {}", frame.carry_over),
                Closing::Object | Closing::Root { .. } => format!("{body} AS {}", frame.carry_over),
            };
            lines.push(format!("WITH {}, {closed}", vars.join(", ")));
        }

        if let Some(root) = self.frames.first() {
            let body = format!("{{{}}}", root.entries.join(", "));
            let ret = match root.closing {
                Closing::Root {
                    array: true,
                    limit: Some(n),
                    ..
                } => format!("RETURN collect({body})[..{n}]"),
                Closing::Root {
                    array: true,
                    limit: None,
                    ..
                } => format!("RETURN collect({body})"),
                Closing::Root {
                    limit_one: true, ..
                } => format!("RETURN {body} LIMIT 1"),
                _ => format!("RETURN {body}"),
            };
            lines.push(ret);
        }

        (lines.join("\n"), self.parameters)
    }

    /// Renders the match clauses followed by `RETURN expr`, ignoring frames.
    pub(crate) fn finish_returning(self, expr: &str) -> (String, IndexMap<String, Value>) {
        let mut lines = self.matches;
        lines.push(format!("RETURN {expr}"));
        (lines.join("\n"), self.parameters)
    }
}
