//! Pipeline driver: runs source text through every stage in order,
//! short-circuiting on the first stage that reports an error and timing
//! each stage it actually runs.

use std::time::{Duration, Instant};

use crate::deserialize::{self, DeserializationProtocol};
use crate::document::Document;
use crate::error::{Error, ErrorList};
use crate::parser;
use crate::schema::{self, Schema};
use crate::semantic;
use crate::tokenizer;
use crate::transformer;

/// Per-stage timings for one `process` call. A stage that never ran
/// (because an earlier one failed) is `None`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PerformanceResults {
    pub tokenization: Option<Duration>,
    pub parsing: Option<Duration>,
    pub semantic_analysis: Option<Duration>,
    pub transformer: Option<Duration>,
    pub schema_validation: Option<Duration>,
    pub deserialization: Option<Duration>,
}

impl PerformanceResults {
    pub fn total(&self) -> Duration {
        [
            self.tokenization,
            self.parsing,
            self.semantic_analysis,
            self.transformer,
            self.schema_validation,
            self.deserialization,
        ]
        .into_iter()
        .flatten()
        .sum()
    }
}

/// The outcome of a full `process` call: either the accumulated stage
/// timings (success), or the errors the first failing stage reported.
#[derive(Debug, Default)]
pub struct ProcessResult {
    pub performance: PerformanceResults,
    pub errors: ErrorList,
}

impl ProcessResult {
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}

fn measure<T>(f: impl FnOnce() -> T) -> (T, Duration) {
    let start = Instant::now();
    let result = f();
    (result, start.elapsed())
}

/// Run `source` through tokenization, parsing, semantic analysis,
/// inheritance resolution, schema validation and deserialization, in
/// that order.
pub fn process(source: &str, schema: &Schema, protocol: &DeserializationProtocol) -> ProcessResult {
    let mut performance = PerformanceResults::default();

    let (tokens, duration) = measure(|| tokenizer::tokenize(source));
    performance.tokenization = Some(duration);
    log::debug!("tokenization took {:?}", duration);
    let tokens = match tokens {
        Ok(tokens) => tokens,
        Err(err) => return failed(performance, err),
    };

    let (document, duration) = measure(|| parser::parse(&tokens));
    performance.parsing = Some(duration);
    log::debug!("parsing took {:?}", duration);
    let mut document: Document = match document {
        Ok(document) => document,
        Err(err) => return failed(performance, err),
    };

    let (semantic_errors, duration) = measure(|| semantic::analyze(&document));
    performance.semantic_analysis = Some(duration);
    log::debug!("semantic analysis took {:?}", duration);
    if !semantic_errors.is_empty() {
        return ProcessResult {
            performance,
            errors: semantic_errors,
        };
    }

    let (_, duration) = measure(|| transformer::transform(&mut document));
    performance.transformer = Some(duration);
    log::debug!("inheritance resolution took {:?}", duration);

    let (schema_errors, duration) = measure(|| schema::validate(schema, &document));
    performance.schema_validation = Some(duration);
    log::debug!("schema validation took {:?}", duration);
    if !schema_errors.is_empty() {
        return ProcessResult {
            performance,
            errors: schema_errors,
        };
    }

    let (deserialization_errors, duration) = measure(|| deserialize::deserialize(protocol, &document));
    performance.deserialization = Some(duration);
    log::debug!("deserialization took {:?}", duration);

    ProcessResult {
        performance,
        errors: deserialization_errors,
    }
}

fn failed(performance: PerformanceResults, err: Error) -> ProcessResult {
    ProcessResult {
        performance,
        errors: vec![err],
    }
}
