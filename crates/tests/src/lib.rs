//! # Integration Tests
//!
//! 集成测试与端到端测试。
//!
//! 负责：
//! - 跨 crate 的注册 / 分发场景
//! - 配置 -> 分发器 的装配测试
//! - 多任务并发访问注册表

#[cfg(test)]
mod support {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use contracts::{BasicEvent, Event, EventHandler};

    pub type TextEvent = BasicEvent<String>;

    /// Handler that records every payload it observes
    #[derive(Default)]
    pub struct Recorder {
        seen: Mutex<Vec<String>>,
    }

    impl Recorder {
        pub fn seen(&self) -> Vec<String> {
            self.seen.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl EventHandler<TextEvent> for Recorder {
        async fn handle(&self, event: &TextEvent) {
            self.seen.lock().unwrap().push(event.payload().clone());
        }
    }
}

#[cfg(test)]
mod e2e_tests {
    use std::sync::Arc;
    use std::time::Duration;

    use contracts::{BasicEvent, Event};
    use dispatcher::{EventDispatcher, FnHandler, LogHandler};

    use crate::support::{Recorder, TextEvent};

    /// Register A, B, C; dispatch; remove B; dispatch again
    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_remove_between_dispatches() {
        let dispatcher = EventDispatcher::<TextEvent>::new();
        let a = Arc::new(Recorder::default());
        let b = Arc::new(Recorder::default());
        let c = Arc::new(Recorder::default());

        dispatcher.register("X", a.clone()).unwrap();
        dispatcher.register("X", b.clone()).unwrap();
        dispatcher.register("X", c.clone()).unwrap();

        dispatcher
            .dispatch(Arc::new(BasicEvent::new("X", "p1".to_string())))
            .await;

        for handler in [&a, &b, &c] {
            assert_eq!(handler.seen(), vec!["p1".to_string()]);
        }

        dispatcher.remove("X", &b);
        assert!(!dispatcher.has("X", &b));
        assert!(dispatcher.has("X", &a));
        assert!(dispatcher.has("X", &c));

        dispatcher
            .dispatch(Arc::new(BasicEvent::new("X", "p2".to_string())))
            .await;

        assert_eq!(a.seen(), vec!["p1".to_string(), "p2".to_string()]);
        assert_eq!(c.seen(), vec!["p1".to_string(), "p2".to_string()]);
        assert_eq!(b.seen(), vec!["p1".to_string()]);
    }

    /// Payload replaced before dispatch is what handlers observe
    #[tokio::test]
    async fn test_payload_set_before_dispatch() {
        let dispatcher = EventDispatcher::<TextEvent>::new();
        let recorder = Arc::new(Recorder::default());
        dispatcher.register("order.updated", recorder.clone()).unwrap();

        let mut event = BasicEvent::new("order.updated", "draft".to_string());
        event.set_payload("submitted".to_string());
        dispatcher.dispatch(Arc::new(event)).await;

        assert_eq!(recorder.seen(), vec!["submitted".to_string()]);
    }

    /// Built-in handlers mixed with user handlers
    #[tokio::test]
    async fn test_builtin_handlers() {
        let dispatcher = EventDispatcher::<TextEvent>::new();
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel::<String>();

        let forward = Arc::new(FnHandler::new(move |event: &TextEvent| {
            let _ = tx.send(event.payload().clone());
        }));

        dispatcher
            .register("audit", Arc::new(LogHandler::new("audit_log")))
            .unwrap();
        dispatcher.register("audit", forward.clone()).unwrap();

        dispatcher
            .dispatch(Arc::new(BasicEvent::new("audit", "login".to_string())))
            .await;

        let received = tokio::time::timeout(Duration::from_secs(1), rx.recv())
            .await
            .unwrap();
        assert_eq!(received.as_deref(), Some("login"));
        assert_eq!(dispatcher.metrics().completed_count, 2);
    }
}

#[cfg(test)]
mod concurrency_tests {
    use std::sync::Arc;

    use contracts::BasicEvent;
    use dispatcher::{DispatcherError, EventDispatcher};

    use crate::support::{Recorder, TextEvent};

    /// Many tasks registering and dispatching through one shared dispatcher
    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_shared_dispatcher_across_tasks() {
        let dispatcher = Arc::new(EventDispatcher::<TextEvent>::new());
        let recorders: Vec<_> = (0..16).map(|_| Arc::new(Recorder::default())).collect();

        let mut tasks = Vec::new();
        for recorder in &recorders {
            let dispatcher = Arc::clone(&dispatcher);
            let recorder = Arc::clone(recorder);
            tasks.push(tokio::spawn(async move {
                dispatcher.register("shared", recorder).unwrap();
            }));
        }
        for task in tasks {
            task.await.unwrap();
        }
        assert_eq!(dispatcher.handler_count("shared"), 16);

        let mut dispatches = Vec::new();
        for i in 0..4 {
            let dispatcher = Arc::clone(&dispatcher);
            dispatches.push(tokio::spawn(async move {
                dispatcher
                    .dispatch(Arc::new(BasicEvent::new("shared", format!("p{i}"))))
                    .await;
            }));
        }
        for task in dispatches {
            task.await.unwrap();
        }

        for recorder in &recorders {
            let mut seen = recorder.seen();
            seen.sort();
            assert_eq!(seen, vec!["p0", "p1", "p2", "p3"]);
        }
    }

    /// Concurrent duplicate registrations of one handler: exactly one wins
    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_duplicate_registration() {
        let dispatcher = Arc::new(EventDispatcher::<TextEvent>::new());
        let handler = Arc::new(Recorder::default());

        let mut tasks = Vec::new();
        for _ in 0..8 {
            let dispatcher = Arc::clone(&dispatcher);
            let handler = Arc::clone(&handler);
            tasks.push(tokio::spawn(
                async move { dispatcher.register("dup", handler) },
            ));
        }

        let mut ok = 0;
        for task in tasks {
            match task.await.unwrap() {
                Ok(()) => ok += 1,
                Err(DispatcherError::AlreadyRegistered { event_name }) => {
                    assert_eq!(event_name, "dup")
                }
            }
        }

        assert_eq!(ok, 1);
        assert_eq!(dispatcher.handler_count("dup"), 1);
    }
}

#[cfg(test)]
mod config_tests {
    use std::sync::Arc;
    use std::time::Duration;

    use async_trait::async_trait;
    use config_loader::{ConfigFormat, ConfigLoader};
    use contracts::{BasicEvent, EventHandler};
    use dispatcher::EventDispatcher;

    use crate::support::TextEvent;

    struct Stuck;

    #[async_trait]
    impl EventHandler<TextEvent> for Stuck {
        async fn handle(&self, _event: &TextEvent) {
            std::future::pending::<()>().await;
        }
    }

    /// Timeout loaded from config bounds a handler that never completes
    #[tokio::test]
    async fn test_configured_timeout_applies() {
        let settings = ConfigLoader::load_from_str(
            "[dispatcher]\nhandler_timeout_ms = 20\n",
            ConfigFormat::Toml,
        )
        .unwrap();

        let dispatcher = EventDispatcher::<TextEvent>::with_config(settings.dispatcher);
        dispatcher.register("stuck", Arc::new(Stuck)).unwrap();

        tokio::time::timeout(
            Duration::from_secs(5),
            dispatcher.dispatch(Arc::new(BasicEvent::new("stuck", String::new()))),
        )
        .await
        .expect("configured timeout should release dispatch");

        assert_eq!(dispatcher.metrics().timeout_count, 1);
    }

    /// Dispatch stats aggregate per-dispatch fan-out
    #[tokio::test]
    async fn test_dispatch_stats() {
        let dispatcher = EventDispatcher::<TextEvent>::new();
        dispatcher
            .register("stuffed", Arc::new(crate::support::Recorder::default()))
            .unwrap();
        let mut stats = observability::DispatchStats::new();

        for name in ["empty", "stuffed"] {
            let started = std::time::Instant::now();
            dispatcher
                .dispatch(Arc::new(BasicEvent::new(name, String::new())))
                .await;
            stats.update(dispatcher.handler_count(name), started.elapsed());
        }

        let summary = stats.summary();
        assert_eq!(summary.total_dispatches, 2);
        assert_eq!(summary.empty_dispatches, 1);
        assert_eq!(summary.fanout.count, 1);
    }
}
