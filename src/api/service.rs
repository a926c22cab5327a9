//! StudyService - request handling over the dataset federation
//!
//! One method per endpoint. Text passes through the study pipeline on the way
//! out: Scripture is sanitized, commentary and dictionary bodies are also
//! reference-decoded, and interlinear verses are rebuilt from tagged words.

use crate::api::request::{
    CommentaryRequest, DefinitionRequest, PassageRequest, Request, SearchRequest, TextRequest, TopicsRequest,
    VerseRequest,
};
use crate::api::response::{
    DefinitionResponse, ModulesResponse, Response, TextBody, TextResponse, Topic, TopicsResponse, VerseEntry,
    VersionsResponse, XrefsResponse,
};
use crate::canon::VerseId;
use crate::config::Config;
use crate::error::{LuminaError, Result};
use crate::search::{SearchEngine, SearchPage};
use crate::storage::{CoreVerseLookup, Dataset, DatasetFederation, DefinitionKind};
use crate::text::{AllowListSanitizer, RenderInput, StudyTextPipeline};
use std::collections::HashMap;
use std::sync::Arc;

/// Answers study requests
pub struct StudyService {
    federation: Arc<DatasetFederation>,
    config: Config,
    pipeline: StudyTextPipeline<AllowListSanitizer, CoreVerseLookup>,
    search: SearchEngine,
}

impl StudyService {
    /// Open the configured datasets and build a service over them
    pub fn open(config: Config) -> Result<Self> {
        config.validate()?;
        let federation = Arc::new(DatasetFederation::open(&config.data)?);
        Ok(Self::new(federation, config))
    }

    pub fn new(federation: Arc<DatasetFederation>, config: Config) -> Self {
        let lookup = CoreVerseLookup::new(Arc::clone(&federation), config.data.label_cache_size);
        let search = SearchEngine::new(
            Arc::clone(&federation),
            config.search.clone(),
            config.study.canonical_version.clone(),
        );

        log::info!(
            "StudyService ready over {} (attached: {:?})",
            federation.data_dir().display(),
            federation.attached_datasets()
        );

        Self {
            federation,
            config,
            pipeline: StudyTextPipeline::new(AllowListSanitizer, lookup),
            search,
        }
    }

    pub fn federation(&self) -> &Arc<DatasetFederation> {
        &self.federation
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn pipeline(&self) -> &StudyTextPipeline<AllowListSanitizer, CoreVerseLookup> {
        &self.pipeline
    }

    /// Validate and dispatch a request
    pub fn handle(&self, request: &Request) -> Result<Response> {
        request.validate()?;
        log::debug!("Handling '{}' request", request.action());

        Ok(match request {
            Request::Text(r) => Response::Text(self.text(r)?),
            Request::Passage(r) => Response::Body(self.passage(r)?),
            Request::Commentary(r) => Response::Body(self.commentary(r)?),
            Request::Xrefs(r) => Response::Xrefs(self.xrefs(r)?),
            Request::Definition(r) => Response::Definition(self.definition(r)?),
            Request::Topics(r) => Response::Topics(self.topics(r)?),
            Request::VersionList => Response::Versions(self.version_list()?),
            Request::CommentaryList => Response::Modules(self.commentary_list()?),
            Request::Search(r) => Response::Search(self.search(r)?),
        })
    }

    /// Handle a request and fold failures into an error body
    pub fn respond(&self, request: &Request) -> Response {
        self.handle(request).unwrap_or_else(|e| {
            if e.is_not_found() {
                log::debug!("'{}' request found nothing: {}", request.action(), e);
            } else {
                log::warn!("'{}' request failed: {}", request.action(), e);
            }
            Response::from(e)
        })
    }

    /// Parse, handle and serialize a JSON request
    pub fn respond_json(&self, json: &str) -> serde_json::Value {
        let response = match Request::from_json(json) {
            Ok(request) => self.respond(&request),
            Err(e) => Response::from(e),
        };
        serde_json::to_value(&response)
            .unwrap_or_else(|e| serde_json::json!({ "error": e.to_string() }))
    }

    /// Named commentary module, or the configured default
    fn commentary_module<'a>(&'a self, requested: Option<&'a str>) -> &'a str {
        requested.unwrap_or(self.config.study.default_commentary.as_str())
    }

    /// Named dictionary module, or the configured default
    fn dictionary_module<'a>(&'a self, requested: Option<&'a str>) -> &'a str {
        requested.unwrap_or(self.config.study.default_dictionary.as_str())
    }

    fn text_dataset(&self, version: &str) -> Dataset {
        self.search.dataset_for(version)
    }

    /// Core id of a verse, or `NotFound` when core has no such row
    fn verse_id(&self, book: &str, chapter: u16, verse: u16) -> Result<VerseId> {
        self.federation
            .canonical_verse_id(book, chapter, verse)?
            .ok_or_else(|| LuminaError::NotFound(format!("Verse not found: {} {}:{}", book, chapter, verse)))
    }

    /// `text`
    pub fn text(&self, request: &TextRequest) -> Result<TextResponse> {
        let dataset = self.text_dataset(&request.version);
        let book_id = self.federation.book_id(&request.book)?;
        let records = self.federation.verse_range(
            dataset,
            &request.version,
            &request.book,
            book_id,
            request.chapter,
            1,
            u16::MAX,
        )?;

        if records.is_empty() {
            return Err(LuminaError::NotFound(format!(
                "Chapter not found: {} {} ({})",
                request.book, request.chapter, request.version
            )));
        }

        let canonical_ids = self.federation.chapter_verse_ids(book_id, request.chapter)?;
        let modules = self.chapter_modules(&canonical_ids)?;
        let interlinear = request.interlinear && self.federation.attach(Dataset::Extras)?;

        let mut verses = Vec::with_capacity(records.len());
        for record in records {
            let canonical = canonical_ids.get(&record.verse).copied();

            let text = match canonical {
                Some(id) if interlinear => {
                    let words = self.federation.verse_words(id)?;
                    if words.is_empty() {
                        self.pipeline.plain(&record.text)
                    } else {
                        self.pipeline.render(RenderInput::Interlinear(&words))
                    }
                }
                _ => self.pipeline.plain(&record.text),
            };

            verses.push(VerseEntry {
                id: record.id,
                verse: record.verse,
                text,
                modules: canonical.and_then(|id| modules.get(&id).cloned()),
            });
        }

        Ok(TextResponse { verses })
    }

    /// Comma-joined module abbreviations per canonical verse of a chapter
    fn chapter_modules(&self, ids: &HashMap<u16, VerseId>) -> Result<HashMap<VerseId, String>> {
        let (Some(first), Some(last)) = (ids.values().min(), ids.values().max()) else {
            return Ok(HashMap::new());
        };
        if !self.federation.attach(Dataset::Commentaries)? {
            return Ok(HashMap::new());
        }

        Ok(self
            .federation
            .commentary_availability(*first, *last)?
            .into_iter()
            .map(|a| (a.verse_id, a.abbreviations.join(",")))
            .collect())
    }

    /// `passage`
    pub fn passage(&self, request: &PassageRequest) -> Result<TextBody> {
        let dataset = self.text_dataset(&request.version);
        let book_id = self.federation.book_id(&request.book)?;
        let last = request.end_verse.unwrap_or(request.verse);
        let records = self.federation.verse_range(
            dataset,
            &request.version,
            &request.book,
            book_id,
            request.chapter,
            request.verse,
            last,
        )?;

        let text = match (request.end_verse, records.as_slice()) {
            (_, []) => self.config.study.missing_verse_text.clone(),
            (None, [first, ..]) => self.pipeline.plain(&first.text),
            (Some(_), verses) => verses
                .iter()
                .map(|v| format!("<sup>{}</sup> {}", v.verse, self.pipeline.plain(&v.text)))
                .collect::<Vec<_>>()
                .join(" "),
        };

        Ok(TextBody { text })
    }

    /// `commentary`
    pub fn commentary(&self, request: &CommentaryRequest) -> Result<TextBody> {
        let verse_id = self.verse_id(&request.book, request.chapter, request.verse)?;
        let module = self.commentary_module(request.module.as_deref());
        let text = match self.federation.commentary_text(module, verse_id)? {
            Some(raw) if !raw.trim().is_empty() => self.pipeline.annotated(&raw),
            _ => self.config.study.missing_commentary_text.clone(),
        };
        Ok(TextBody { text })
    }

    /// `xrefs`
    pub fn xrefs(&self, request: &VerseRequest) -> Result<XrefsResponse> {
        let verse_id = self.verse_id(&request.book, request.chapter, request.verse)?;

        let mut xrefs = Vec::new();
        for edge in self.federation.cross_references(verse_id)? {
            match self.federation.verse_ref(edge.to)? {
                Some(target) => xrefs.push(target),
                None => log::warn!("Cross reference target {} has no row in core", edge.to),
            }
        }
        Ok(XrefsResponse { xrefs })
    }

    /// `definition`
    pub fn definition(&self, request: &DefinitionRequest) -> Result<DefinitionResponse> {
        let raw = match request.kind {
            DefinitionKind::StrongHebrew | DefinitionKind::StrongGreek => {
                self.federation.lexicon_definition(&request.term)?
            }
            DefinitionKind::Dictionary => self
                .federation
                .dictionary_definition(&request.term, self.dictionary_module(request.module.as_deref()))?,
        };

        let definition = match raw {
            Some(raw) => self.pipeline.annotated(&raw),
            None => self.config.study.missing_definition_text.clone(),
        };
        Ok(DefinitionResponse { definition })
    }

    /// `topics`
    pub fn topics(&self, request: &TopicsRequest) -> Result<TopicsResponse> {
        let module = self.dictionary_module(request.module.as_deref()).trim().to_uppercase();
        let values = match module.as_str() {
            "HEBREW" => self.federation.lexicon_ids("H")?,
            "GREEK" => self.federation.lexicon_ids("G")?,
            _ => self.federation.dictionary_topics(&module)?,
        };
        Ok(TopicsResponse {
            topics: values.into_iter().map(Topic::new).collect(),
        })
    }

    /// `version_list`: versions across core and, when installed, versions
    pub fn version_list(&self) -> Result<VersionsResponse> {
        let mut versions = self.federation.versions_in(Dataset::Core)?;
        if self.federation.attach(Dataset::Versions)? {
            for version in self.federation.versions_in(Dataset::Versions)? {
                if !versions.contains(&version) {
                    versions.push(version);
                }
            }
        }
        Ok(VersionsResponse { versions })
    }

    /// `commentary_list`: upper-cased abbreviations, or the configured
    /// fallback when the installed dataset holds no modules
    pub fn commentary_list(&self) -> Result<ModulesResponse> {
        let modules: Vec<String> = self
            .federation
            .commentary_modules()?
            .into_iter()
            .map(|m| m.abbreviation.to_uppercase())
            .collect();

        if modules.is_empty() {
            return Ok(ModulesResponse {
                modules: self.config.study.fallback_commentaries.clone(),
            });
        }
        Ok(ModulesResponse { modules })
    }

    /// `search`
    pub fn search(&self, request: &SearchRequest) -> Result<SearchPage> {
        let query = self
            .search
            .query(request.q.as_str(), request.version.as_str(), request.scope.clone(), request.offset);
        self.search.search(&query)
    }
}
