use std::collections::HashSet;
use std::fmt::Debug;
use std::future::Future;
use std::hash::Hash;

use futures::future::{BoxFuture, FutureExt};
use futures::stream::{FuturesUnordered, StreamExt};
use tracing::debug;

/// What a task tells the scheduler once it finishes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskStep<H> {
    Continue,
    Halt(H),
}

/// Result of running a graph to completion or to the first halt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GraphRun<K, H> {
    Completed { order: Vec<K> },
    Halted { task: K, halt: H, completed: Vec<K> },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GraphError {
    #[error("task {0} is registered more than once")]
    DuplicateTask(String),
    #[error("task {task} depends on unregistered task {dependency}")]
    UnknownDependency { task: String, dependency: String },
    #[error("tasks can never become ready: {0:?}")]
    Unsatisfiable(Vec<String>),
}

type TaskFn<'a, H, E> = Box<dyn FnOnce() -> BoxFuture<'a, Result<TaskStep<H>, E>> + Send + 'a>;

struct TaskNode<'a, K, H, E> {
    id: K,
    deps: Vec<K>,
    run: TaskFn<'a, H, E>,
}

/// Dependency-ordered task scheduler.
///
/// Tasks whose dependencies have all completed are fired together and polled
/// concurrently on the calling task. The first `Halt` stops scheduling and
/// abandons whatever is still in flight.
pub struct TaskGraph<'a, K, H, E> {
    nodes: Vec<TaskNode<'a, K, H, E>>,
}

impl<'a, K, H, E> Default for TaskGraph<'a, K, H, E> {
    fn default() -> Self {
        Self { nodes: Vec::new() }
    }
}

impl<'a, K, H, E> TaskGraph<'a, K, H, E>
where
    K: Copy + Eq + Hash + Debug + Send + 'a,
    H: Send + 'a,
    E: From<GraphError> + Send + 'a,
{
    pub fn new() -> Self {
        Self::default()
    }

    pub fn task<F, Fut>(mut self, id: K, deps: &[K], run: F) -> Self
    where
        F: FnOnce() -> Fut + Send + 'a,
        Fut: Future<Output = Result<TaskStep<H>, E>> + Send + 'a,
    {
        self.nodes.push(TaskNode {
            id,
            deps: deps.to_vec(),
            run: Box::new(move || run().boxed()),
        });
        self
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn validate(&self) -> Result<(), GraphError> {
        let mut seen = HashSet::new();
        for node in &self.nodes {
            if !seen.insert(node.id) {
                return Err(GraphError::DuplicateTask(format!("{:?}", node.id)));
            }
        }

        for node in &self.nodes {
            if let Some(missing) = node.deps.iter().find(|dep| !seen.contains(*dep)) {
                return Err(GraphError::UnknownDependency {
                    task: format!("{:?}", node.id),
                    dependency: format!("{missing:?}"),
                });
            }
        }

        Ok(())
    }

    pub async fn run(self) -> Result<GraphRun<K, H>, E> {
        self.validate()?;

        let mut pending = self.nodes;
        let mut done: HashSet<K> = HashSet::new();
        let mut order: Vec<K> = Vec::new();
        let mut in_flight = FuturesUnordered::new();

        loop {
            let mut index = 0;
            while index < pending.len() {
                if pending[index].deps.iter().all(|dep| done.contains(dep)) {
                    let node = pending.remove(index);
                    let id = node.id;
                    debug!(task = ?id, "task fired");
                    in_flight.push((node.run)().map(move |result| (id, result)));
                } else {
                    index += 1;
                }
            }

            let Some((id, result)) = in_flight.next().await else {
                if pending.is_empty() {
                    return Ok(GraphRun::Completed { order });
                }
                let stuck = pending
                    .iter()
                    .map(|node| format!("{:?}", node.id))
                    .collect();
                return Err(GraphError::Unsatisfiable(stuck).into());
            };

            match result? {
                TaskStep::Continue => {
                    debug!(task = ?id, "task completed");
                    done.insert(id);
                    order.push(id);
                }
                TaskStep::Halt(halt) => {
                    debug!(task = ?id, abandoned = in_flight.len(), "task halted graph");
                    return Ok(GraphRun::Halted {
                        task: id,
                        halt,
                        completed: order,
                    });
                }
            }
        }
    }
}
