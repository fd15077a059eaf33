#![allow(dead_code)]

use async_trait::async_trait;
use secrecy::SecretString;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use tuitionbot::api::{ChatCompletionProvider, EmbeddingProvider};
use tuitionbot::models::{
    KnowledgeDocument, KnowledgeMatch, Message, QaPair, SlotIdentifier, SlotRecord, ToolCall,
};
use tuitionbot::store::{locate_bookable, KnowledgeStore, SchedulingStore, StoreError, StoreResult};
use tuitionbot::tools::ToolRegistry;
use tuitionbot::{BotError, Result};

pub const ADMIN_PASSWORD: &str = "s3cret-admin";

pub fn registry(store: Arc<InMemoryScheduleStore>) -> ToolRegistry {
    ToolRegistry::new(store, SecretString::from(ADMIN_PASSWORD.to_string()))
}

pub fn slot(date: &str, time: &str, subject: &str, teacher: &str) -> SlotIdentifier {
    SlotIdentifier::new(date, time, subject, teacher)
}

pub fn tool_call(id: &str, name: &str, arguments: Value) -> ToolCall {
    ToolCall::function(id, name, arguments.to_string())
}

pub fn tool_request(calls: Vec<ToolCall>) -> Message {
    Message::assistant_with_tools(None, calls)
}

/// Completion provider that replays scripted responses and records requests.
pub struct ScriptedProvider {
    responses: Mutex<VecDeque<Message>>,
    repeat: Option<Message>,
    fail: bool,
    requests: Mutex<Vec<Vec<Message>>>,
    tools_seen: Mutex<Vec<usize>>,
}

impl ScriptedProvider {
    pub fn new(responses: Vec<Message>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            repeat: None,
            fail: false,
            requests: Mutex::new(Vec::new()),
            tools_seen: Mutex::new(Vec::new()),
        }
    }

    /// Returns the same response on every call.
    pub fn always(response: Message) -> Self {
        Self {
            repeat: Some(response),
            ..Self::new(vec![])
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new(vec![])
        }
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn request(&self, index: usize) -> Vec<Message> {
        self.requests.lock().unwrap()[index].clone()
    }

    pub fn tool_counts(&self) -> Vec<usize> {
        self.tools_seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatCompletionProvider for ScriptedProvider {
    async fn complete(&self, messages: &[Message], tools: &[Value]) -> Result<Message> {
        self.requests.lock().unwrap().push(messages.to_vec());
        self.tools_seen.lock().unwrap().push(tools.len());

        if self.fail {
            return Err(BotError::ApiError {
                status: 503,
                message: "upstream unavailable".to_string(),
            });
        }
        if let Some(response) = &self.repeat {
            return Ok(response.clone());
        }
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| BotError::Other("script exhausted".to_string()))
    }

    fn model_name(&self) -> &str {
        "scripted-model"
    }
}

type RaceHook = Box<dyn FnOnce(&mut Vec<SlotRecord>) + Send>;

/// Schedule store double with mutation counting and race injection.
pub struct InMemoryScheduleStore {
    rows: Mutex<Vec<SlotRecord>>,
    mutations: AtomicUsize,
    append_calls: AtomicUsize,
    before_book: Mutex<Option<RaceHook>>,
    unavailable: bool,
}

impl InMemoryScheduleStore {
    pub fn new() -> Self {
        Self::with_slots(vec![])
    }

    pub fn with_slots(slots: Vec<SlotIdentifier>) -> Self {
        let rows = slots
            .into_iter()
            .enumerate()
            .map(|(index, slot)| SlotRecord::open(index + 2, slot))
            .collect();
        Self {
            rows: Mutex::new(rows),
            mutations: AtomicUsize::new(0),
            append_calls: AtomicUsize::new(0),
            before_book: Mutex::new(None),
            unavailable: false,
        }
    }

    pub fn unavailable() -> Self {
        Self {
            unavailable: true,
            ..Self::new()
        }
    }

    /// Appends a row without any duplicate check, like a manual sheet edit.
    pub fn push_row(&self, slot: SlotIdentifier, student: &str) {
        let mut rows = self.rows.lock().unwrap();
        let position = rows.len() + 2;
        let mut record = SlotRecord::open(position, slot);
        record.student_name = student.to_string();
        rows.push(record);
    }

    pub fn book_directly(&self, slot: &SlotIdentifier, student: &str) {
        let mut rows = self.rows.lock().unwrap();
        if let Some(row) = rows.iter_mut().find(|r| r.slot.matches(slot)) {
            row.student_name = student.to_string();
        }
    }

    /// Runs `hook` against the rows right before the next booking reads them,
    /// simulating a write by another client.
    pub fn inject_before_book(&self, hook: impl FnOnce(&mut Vec<SlotRecord>) + Send + 'static) {
        *self.before_book.lock().unwrap() = Some(Box::new(hook));
    }

    pub fn rows(&self) -> Vec<SlotRecord> {
        self.rows.lock().unwrap().clone()
    }

    pub fn row(&self, slot: &SlotIdentifier) -> Option<SlotRecord> {
        self.rows().into_iter().find(|r| r.slot.matches(slot))
    }

    pub fn mutations(&self) -> usize {
        self.mutations.load(Ordering::SeqCst)
    }

    pub fn append_calls(&self) -> usize {
        self.append_calls.load(Ordering::SeqCst)
    }

    fn check_available(&self) -> StoreResult<()> {
        if self.unavailable {
            return Err(StoreError::Http {
                status: 503,
                message: "sheet unavailable".to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl SchedulingStore for InMemoryScheduleStore {
    async fn list_slots(&self) -> StoreResult<Vec<SlotRecord>> {
        self.check_available()?;
        Ok(self.rows())
    }

    async fn book_if_free(&self, slot: &SlotIdentifier, student_name: &str, contact_info: &str) -> StoreResult<()> {
        self.check_available()?;
        let hook = self.before_book.lock().unwrap().take();
        let mut rows = self.rows.lock().unwrap();
        if let Some(hook) = hook {
            hook(&mut *rows);
        }

        let position = locate_bookable(&rows, slot)?.position;
        let row = rows
            .iter_mut()
            .find(|r| r.position == position)
            .ok_or(StoreError::NotFound)?;
        row.student_name = student_name.to_string();
        row.contact_info = contact_info.to_string();
        self.mutations.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn append_slot(&self, slot: &SlotIdentifier) -> StoreResult<()> {
        self.append_slots(std::slice::from_ref(slot)).await.map(|_| ())
    }

    async fn append_slots(&self, slots: &[SlotIdentifier]) -> StoreResult<usize> {
        self.check_available()?;
        let mut rows = self.rows.lock().unwrap();
        for slot in slots {
            let position = rows.len() + 2;
            rows.push(SlotRecord::open(position, slot.normalized()));
        }
        self.append_calls.fetch_add(1, Ordering::SeqCst);
        self.mutations.fetch_add(slots.len(), Ordering::SeqCst);
        Ok(slots.len())
    }
}

/// Embedding double returning a fixed vector, or failing.
pub struct StaticEmbedder {
    fail: bool,
    fail_on: Option<String>,
    pub calls: AtomicUsize,
}

impl StaticEmbedder {
    pub fn ok() -> Self {
        Self {
            fail: false,
            fail_on: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::ok()
        }
    }

    /// Fails only for text containing `needle`.
    pub fn failing_on(needle: &str) -> Self {
        Self {
            fail_on: Some(needle.to_string()),
            ..Self::ok()
        }
    }
}

#[async_trait]
impl EmbeddingProvider for StaticEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let targeted = self.fail_on.as_deref().is_some_and(|needle| text.contains(needle));
        if self.fail || targeted {
            return Err(BotError::ApiError {
                status: 500,
                message: "embedding failed".to_string(),
            });
        }
        Ok(vec![0.1, 0.2, 0.3])
    }
}

/// Knowledge store double.
pub struct InMemoryKnowledgeStore {
    pub pairs: Vec<QaPair>,
    pub matches: Vec<KnowledgeMatch>,
    pub documents: Mutex<Vec<KnowledgeDocument>>,
    pub fail_match: bool,
    pub fail_list: bool,
    pub last_query: Mutex<Option<(f32, usize)>>,
}

impl InMemoryKnowledgeStore {
    pub fn new(pairs: Vec<QaPair>, matches: Vec<&str>) -> Self {
        Self {
            pairs,
            matches: matches
                .into_iter()
                .map(|content| KnowledgeMatch {
                    content: content.to_string(),
                    similarity: 0.9,
                })
                .collect(),
            documents: Mutex::new(vec![]),
            fail_match: false,
            fail_list: false,
            last_query: Mutex::new(None),
        }
    }

    pub fn failing() -> Self {
        Self {
            fail_match: true,
            fail_list: true,
            ..Self::new(vec![], vec![])
        }
    }

    pub fn documents(&self) -> Vec<KnowledgeDocument> {
        self.documents.lock().unwrap().clone()
    }

    fn outage() -> StoreError {
        StoreError::Http {
            status: 503,
            message: "knowledge store unavailable".to_string(),
        }
    }
}

#[async_trait]
impl KnowledgeStore for InMemoryKnowledgeStore {
    async fn match_documents(&self, _embedding: &[f32], threshold: f32, count: usize) -> StoreResult<Vec<KnowledgeMatch>> {
        *self.last_query.lock().unwrap() = Some((threshold, count));
        if self.fail_match {
            return Err(Self::outage());
        }
        Ok(self.matches.clone())
    }

    async fn list_qa_pairs(&self) -> StoreResult<Vec<QaPair>> {
        if self.fail_list {
            return Err(Self::outage());
        }
        Ok(self.pairs.clone())
    }

    async fn clear_documents(&self) -> StoreResult<()> {
        self.documents.lock().unwrap().clear();
        Ok(())
    }

    async fn insert_document(&self, document: &KnowledgeDocument) -> StoreResult<()> {
        self.documents.lock().unwrap().push(document.clone());
        Ok(())
    }
}
