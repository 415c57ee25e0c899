//! Supervisor search satellite: an in-memory directory ranked by
//! token matches against expertise topics.

use serde::{Deserialize, Serialize};

use crate::error::AppError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Supervisor {
    pub id: String,
    pub name: String,
    /// e.g. ["machine learning", "nlp"]
    pub expertise_topics: Vec<String>,
    /// 1.0 (low) to 5.0 (high)
    pub rating: f64,
    /// Theses currently supervised.
    pub current_load: u32,
    pub max_load: u32,
}

#[derive(Debug, Clone, Default)]
pub struct SearchOptions {
    /// Cap on the number of matches returned.
    pub max_results: Option<usize>,
    /// Keep supervisors already at max_load.
    pub include_full: bool,
}

/// Partial update; `None` fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SupervisorUpdate {
    pub name: Option<String>,
    pub expertise_topics: Option<Vec<String>>,
    pub rating: Option<f64>,
    pub current_load: Option<u32>,
    pub max_load: Option<u32>,
}

#[derive(Default)]
pub struct SupervisorDirectory {
    supervisors: Vec<Supervisor>,
}

impl SupervisorDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, supervisor: Supervisor) -> Result<(), AppError> {
        if self.supervisors.iter().any(|s| s.id == supervisor.id) {
            return Err(AppError::BadRequest(format!(
                "Supervisor with id {} already exists",
                supervisor.id
            )));
        }
        self.supervisors.push(supervisor);
        Ok(())
    }

    pub fn remove(&mut self, id: &str) -> Result<(), AppError> {
        let idx = self
            .supervisors
            .iter()
            .position(|s| s.id == id)
            .ok_or_else(|| {
                AppError::BadRequest(format!("Supervisor with id {id} not found"))
            })?;
        self.supervisors.remove(idx);
        Ok(())
    }

    pub fn update(&mut self, id: &str, updates: SupervisorUpdate) -> Result<(), AppError> {
        let supervisor = self
            .supervisors
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| {
                AppError::BadRequest(format!("Supervisor with id {id} not found"))
            })?;

        if let Some(name) = updates.name {
            supervisor.name = name;
        }
        if let Some(topics) = updates.expertise_topics {
            supervisor.expertise_topics = topics;
        }
        if let Some(rating) = updates.rating {
            supervisor.rating = rating;
        }
        if let Some(load) = updates.current_load {
            supervisor.current_load = load;
        }
        if let Some(max) = updates.max_load {
            supervisor.max_load = max;
        }
        Ok(())
    }

    /// Match query tokens against expertise-topic tokens and rank by match
    /// count, then rating, then name. Full supervisors are dropped unless
    /// `include_full` is set or they matched at least one token.
    pub fn find(&self, query: &str, options: &SearchOptions) -> Vec<Supervisor> {
        let terms = tokenize(query);

        let mut scored: Vec<(usize, &Supervisor)> = self
            .supervisors
            .iter()
            .map(|sp| {
                let topic_words: Vec<String> = sp
                    .expertise_topics
                    .iter()
                    .flat_map(|t| tokenize(t))
                    .collect();
                let match_count = terms
                    .iter()
                    .filter(|t| topic_words.contains(t))
                    .count();
                (match_count, sp)
            })
            .filter(|(match_count, sp)| {
                options.include_full || sp.current_load < sp.max_load || *match_count > 0
            })
            .collect();

        scored.sort_by(|(a_count, a), (b_count, b)| {
            b_count
                .cmp(a_count)
                .then_with(|| b.rating.total_cmp(&a.rating))
                .then_with(|| a.name.cmp(&b.name))
        });

        let limit = options.max_results.unwrap_or(usize::MAX);
        scored
            .into_iter()
            .take(limit)
            .map(|(_, sp)| sp.clone())
            .collect()
    }

    pub fn clear(&mut self) {
        self.supervisors.clear();
    }
}

/// Lowercase and split on every non-alphanumeric run.
pub fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|tok| !tok.is_empty())
        .map(str::to_string)
        .collect()
}
