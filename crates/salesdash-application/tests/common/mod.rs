//! Scripted backend services shared by the integration tests.
#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use salesdash_core::sales::{SalesAnalytics, SalesData};
use salesdash_core::service::{AskService, HealthReport, HealthService, SalesDataService};
use salesdash_core::{DashError, Result};
use serde_json::{Value, json};
use tokio::sync::oneshot;

pub const TIMEOUT: Duration = Duration::from_secs(10);

enum Step<T> {
    Ready(Result<T>),
    Gated(oneshot::Receiver<Result<T>>),
    Delayed(Duration, Result<T>),
}

/// Replies in the order they were queued, then falls back to a fixed reply.
pub struct Script<T> {
    steps: Mutex<VecDeque<Step<T>>>,
    fallback: Result<T>,
    calls: AtomicUsize,
    outstanding: AtomicUsize,
}

/// Counts a call as outstanding until its future completes or is dropped.
struct Outstanding<'a>(&'a AtomicUsize);

impl<'a> Outstanding<'a> {
    fn enter(counter: &'a AtomicUsize) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(counter)
    }
}

impl Drop for Outstanding<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

impl<T: Clone + Send> Script<T> {
    pub fn new(fallback: Result<T>) -> Self {
        Self {
            steps: Mutex::new(VecDeque::new()),
            fallback,
            calls: AtomicUsize::new(0),
            outstanding: AtomicUsize::new(0),
        }
    }

    pub fn push(&self, reply: Result<T>) {
        self.steps.lock().unwrap().push_back(Step::Ready(reply));
    }

    /// Queues a reply that is held until the returned sender fires.
    pub fn push_gate(&self) -> oneshot::Sender<Result<T>> {
        let (tx, rx) = oneshot::channel();
        self.steps.lock().unwrap().push_back(Step::Gated(rx));
        tx
    }

    pub fn push_delayed(&self, delay: Duration, reply: Result<T>) {
        self.steps
            .lock()
            .unwrap()
            .push_back(Step::Delayed(delay, reply));
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Calls started but not yet finished or cancelled.
    pub fn outstanding(&self) -> usize {
        self.outstanding.load(Ordering::SeqCst)
    }

    async fn next(&self) -> Result<T> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let _outstanding = Outstanding::enter(&self.outstanding);
        let step = self.steps.lock().unwrap().pop_front();
        match step {
            None => self.fallback.clone(),
            Some(Step::Ready(reply)) => reply,
            Some(Step::Gated(rx)) => rx
                .await
                .unwrap_or_else(|_| Err(DashError::internal("gate dropped"))),
            Some(Step::Delayed(delay, reply)) => {
                tokio::time::sleep(delay).await;
                reply
            }
        }
    }
}

pub struct ScriptedAsk {
    pub script: Script<String>,
    questions: Mutex<Vec<String>>,
}

impl ScriptedAsk {
    pub fn new() -> Self {
        Self {
            script: Script::new(Ok("ok".to_string())),
            questions: Mutex::new(Vec::new()),
        }
    }

    pub fn questions(&self) -> Vec<String> {
        self.questions.lock().unwrap().clone()
    }
}

#[async_trait]
impl AskService for ScriptedAsk {
    async fn ask(&self, question: &str) -> Result<String> {
        self.questions.lock().unwrap().push(question.to_string());
        self.script.next().await
    }
}

pub struct ScriptedHealth {
    pub script: Script<Value>,
}

impl ScriptedHealth {
    pub fn new() -> Self {
        Self {
            script: Script::new(Ok(healthy())),
        }
    }
}

#[async_trait]
impl HealthService for ScriptedHealth {
    async fn fetch_health(&self) -> Result<HealthReport> {
        let payload = self.script.next().await?;
        Ok(HealthReport {
            payload,
            latency: Duration::from_millis(12),
        })
    }
}

pub struct ScriptedSales {
    pub data: Script<SalesData>,
    pub analytics: Script<SalesAnalytics>,
}

impl ScriptedSales {
    pub fn new() -> Self {
        Self {
            data: Script::new(Ok(SalesData::default())),
            analytics: Script::new(Ok(SalesAnalytics::default())),
        }
    }
}

#[async_trait]
impl SalesDataService for ScriptedSales {
    async fn fetch_sales_data(&self) -> Result<SalesData> {
        self.data.next().await
    }

    async fn fetch_analytics(&self) -> Result<SalesAnalytics> {
        self.analytics.next().await
    }
}

pub fn healthy() -> Value {
    json!({
        "status": "healthy",
        "version": "1.4.0",
        "components": { "database": true, "llm": { "status": "up", "responseTime": 12.34 } }
    })
}

pub fn refused() -> DashError {
    DashError::transport("connection refused")
}

/// Lets spawned tasks on the current-thread runtime run until they block.
pub async fn settle() {
    for _ in 0..20 {
        tokio::task::yield_now().await;
    }
}
