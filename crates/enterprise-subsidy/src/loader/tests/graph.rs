use std::sync::Mutex;
use std::time::Duration;

use tokio::sync::Barrier;

use crate::loader::{GraphError, GraphRun, TaskGraph, TaskStep};

type Step = Result<TaskStep<&'static str>, GraphError>;

#[tokio::test]
async fn dependent_tasks_run_after_their_dependencies() {
    let log = Mutex::new(Vec::new());
    let log = &log;

    let run = TaskGraph::new()
        .task("finalize", &["metadata", "policies"], move || async move {
            log.lock().expect("log mutex").push("finalize");
            Step::Ok(TaskStep::Continue)
        })
        .task("metadata", &["enterprise"], move || async move {
            log.lock().expect("log mutex").push("metadata");
            Step::Ok(TaskStep::Continue)
        })
        .task("enterprise", &[], move || async move {
            log.lock().expect("log mutex").push("enterprise");
            Step::Ok(TaskStep::Continue)
        })
        .task("policies", &["enterprise"], move || async move {
            log.lock().expect("log mutex").push("policies");
            Step::Ok(TaskStep::Continue)
        })
        .run()
        .await
        .expect("graph runs");

    let GraphRun::Completed { order } = &run else {
        panic!("expected completion, got {run:?}");
    };
    assert_eq!(order.first(), Some(&"enterprise"));
    assert_eq!(order.last(), Some(&"finalize"));
    assert_eq!(order.len(), 4);
    assert_eq!(log.lock().expect("log mutex").len(), 4);
}

#[tokio::test]
async fn independent_tasks_are_polled_concurrently() {
    let barrier = Barrier::new(3);
    let barrier = &barrier;

    let graph = TaskGraph::new()
        .task("root", &[], || async { Step::Ok(TaskStep::Continue) })
        .task("a", &["root"], move || async move {
            barrier.wait().await;
            Step::Ok(TaskStep::Continue)
        })
        .task("b", &["root"], move || async move {
            barrier.wait().await;
            Step::Ok(TaskStep::Continue)
        })
        .task("c", &["root"], move || async move {
            barrier.wait().await;
            Step::Ok(TaskStep::Continue)
        });

    let run = tokio::time::timeout(Duration::from_secs(5), graph.run())
        .await
        .expect("siblings ran together")
        .expect("graph runs");

    assert!(matches!(run, GraphRun::Completed { ref order } if order.len() == 4));
}

#[tokio::test]
async fn halt_stops_scheduling_and_abandons_in_flight_tasks() {
    let downstream_ran = Mutex::new(false);
    let downstream_ran = &downstream_ran;

    let run = TaskGraph::new()
        .task("root", &[], || async { Step::Ok(TaskStep::Continue) })
        .task("slow", &["root"], || async {
            std::future::pending::<()>().await;
            Step::Ok(TaskStep::Continue)
        })
        .task("gate", &["root"], || async {
            Step::Ok(TaskStep::Halt("redirect"))
        })
        .task("after_gate", &["gate"], move || async move {
            *downstream_ran.lock().expect("flag mutex") = true;
            Step::Ok(TaskStep::Continue)
        })
        .run()
        .await
        .expect("graph runs");

    assert_eq!(
        run,
        GraphRun::Halted {
            task: "gate",
            halt: "redirect",
            completed: vec!["root"],
        }
    );
    assert!(!*downstream_ran.lock().expect("flag mutex"));
}

#[tokio::test]
async fn task_errors_propagate() {
    let err = TaskGraph::new()
        .task("root", &[], || async {
            Step::Err(GraphError::Unsatisfiable(vec!["upstream".to_string()]))
        })
        .task("child", &["root"], || async { Step::Ok(TaskStep::Continue) })
        .run()
        .await
        .expect_err("error surfaces");

    assert_eq!(err, GraphError::Unsatisfiable(vec!["upstream".to_string()]));
}

#[tokio::test]
async fn duplicate_tasks_are_rejected() {
    let err = TaskGraph::new()
        .task("root", &[], || async { Step::Ok(TaskStep::Continue) })
        .task("root", &[], || async { Step::Ok(TaskStep::Continue) })
        .run()
        .await
        .expect_err("duplicate rejected");

    assert!(matches!(err, GraphError::DuplicateTask(_)));
}

#[tokio::test]
async fn unknown_dependencies_are_rejected() {
    let err = TaskGraph::new()
        .task("child", &["missing"], || async { Step::Ok(TaskStep::Continue) })
        .run()
        .await
        .expect_err("unknown dependency rejected");

    assert!(matches!(err, GraphError::UnknownDependency { .. }));
}

#[tokio::test]
async fn cycles_are_reported_as_unsatisfiable() {
    let graph = TaskGraph::new()
        .task("root", &[], || async { Step::Ok(TaskStep::Continue) })
        .task("a", &["b"], || async { Step::Ok(TaskStep::Continue) })
        .task("b", &["a"], || async { Step::Ok(TaskStep::Continue) });
    assert_eq!(graph.len(), 3);

    let err = graph.run().await.expect_err("cycle detected");

    match err {
        GraphError::Unsatisfiable(stuck) => assert_eq!(stuck.len(), 2),
        other => panic!("expected unsatisfiable graph, got {other:?}"),
    }
}
