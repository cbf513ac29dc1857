//! Skill taxonomy: canonical skill names, their synonyms, and the phrase index
//! the extractor matches against.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::matching::tokenize::tokenize;

#[derive(Debug, Error)]
pub enum TaxonomyError {
    #[error("Taxonomy entry {index} has an empty canonical name")]
    EmptyCanonical { index: usize },

    #[error("Skill '{canonical}' is listed more than once")]
    DuplicateCanonical { canonical: String },

    #[error("Phrase '{phrase}' of skill '{canonical}' contains no matchable tokens")]
    EmptyPhrase { canonical: String, phrase: String },

    #[error("Failed to read taxonomy file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid taxonomy JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// One canonical skill with the alternative spellings that resolve to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxonomyEntry {
    pub canonical: String,
    #[serde(default)]
    pub synonyms: Vec<String>,
}

impl TaxonomyEntry {
    pub fn new(canonical: impl Into<String>, synonyms: &[&str]) -> Self {
        Self {
            canonical: canonical.into(),
            synonyms: synonyms.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Immutable, ordered skill catalogue. Shared across tasks as `Arc<Taxonomy>`.
#[derive(Debug, Clone)]
pub struct Taxonomy {
    entries: Vec<TaxonomyEntry>,
    /// Tokenized phrase → index into `entries`. First entry to claim a phrase owns it.
    phrases: HashMap<Vec<String>, usize>,
    max_phrase_tokens: usize,
}

impl Taxonomy {
    pub fn new(mut entries: Vec<TaxonomyEntry>) -> Result<Self, TaxonomyError> {
        for entry in &mut entries {
            entry.canonical = entry.canonical.trim().to_string();
        }

        let mut phrases: HashMap<Vec<String>, usize> = HashMap::new();
        let mut seen_canonical: HashMap<String, usize> = HashMap::new();
        let mut max_phrase_tokens = 0;

        for (index, entry) in entries.iter().enumerate() {
            let canonical = entry.canonical.as_str();
            if canonical.is_empty() {
                return Err(TaxonomyError::EmptyCanonical { index });
            }
            if seen_canonical
                .insert(canonical.to_lowercase(), index)
                .is_some()
            {
                return Err(TaxonomyError::DuplicateCanonical {
                    canonical: canonical.to_string(),
                });
            }

            for phrase in std::iter::once(&entry.canonical).chain(entry.synonyms.iter()) {
                let tokens = tokenize(phrase);
                if tokens.is_empty() {
                    return Err(TaxonomyError::EmptyPhrase {
                        canonical: canonical.to_string(),
                        phrase: phrase.clone(),
                    });
                }
                max_phrase_tokens = max_phrase_tokens.max(tokens.len());
                phrases.entry(tokens).or_insert(index);
            }
        }

        Ok(Self {
            entries,
            phrases,
            max_phrase_tokens,
        })
    }

    /// Parses a JSON array of `{"canonical": ..., "synonyms": [...]}` objects.
    pub fn from_json_str(json: &str) -> Result<Self, TaxonomyError> {
        let entries: Vec<TaxonomyEntry> = serde_json::from_str(json)?;
        Self::new(entries)
    }

    pub fn load(path: &Path) -> Result<Self, TaxonomyError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    /// The catalogue shipped with the service.
    pub fn builtin() -> Result<Self, TaxonomyError> {
        let entries = BUILTIN_SKILLS
            .iter()
            .map(|(canonical, synonyms)| TaxonomyEntry::new(*canonical, synonyms))
            .collect();
        Self::new(entries)
    }

    pub fn entries(&self) -> &[TaxonomyEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn canonical(&self, index: usize) -> &str {
        &self.entries[index].canonical
    }

    pub(crate) fn lookup(&self, tokens: &[String]) -> Option<usize> {
        self.phrases.get(tokens).copied()
    }

    pub(crate) fn max_phrase_tokens(&self) -> usize {
        self.max_phrase_tokens
    }
}

/// Canonical skill → synonyms. Order is the reporting order for matched and missing skills.
const BUILTIN_SKILLS: &[(&str, &[&str])] = &[
    // Core concepts
    ("machine learning", &["ml"]),
    ("deep learning", &["dl"]),
    ("natural language processing", &["nlp"]),
    ("computer vision", &[]),
    ("ci/cd", &["continuous integration", "continuous deployment"]),
    // Programming languages
    ("python", &[]),
    ("java", &[]),
    ("c", &[]),
    ("c++", &["cpp"]),
    ("c#", &["csharp"]),
    ("golang", &["go lang"]),
    ("rust", &[]),
    ("ruby", &[]),
    ("php", &[]),
    ("javascript", &["js"]),
    ("typescript", &["ts"]),
    ("scala", &[]),
    ("julia", &[]),
    // Data analysis and statistics
    ("data analysis", &[]),
    ("exploratory data analysis", &["eda"]),
    ("data cleaning", &[]),
    ("data preprocessing", &[]),
    ("feature engineering", &[]),
    ("data mining", &[]),
    ("data wrangling", &[]),
    ("statistics", &[]),
    ("probability", &[]),
    ("hypothesis testing", &[]),
    ("a/b testing", &["ab testing"]),
    ("bayesian statistics", &[]),
    ("excel", &[]),
    ("spreadsheets", &["spreadsheet"]),
    // Machine learning algorithms
    ("supervised learning", &[]),
    ("unsupervised learning", &[]),
    ("reinforcement learning", &[]),
    ("semi-supervised learning", &[]),
    ("linear regression", &[]),
    ("logistic regression", &[]),
    ("decision trees", &["decision tree"]),
    ("random forest", &["random forests"]),
    ("gradient boosting", &[]),
    ("xgboost", &[]),
    ("lightgbm", &[]),
    ("catboost", &[]),
    (
        "support vector machines",
        &["svm", "support vector machine"],
    ),
    ("clustering", &[]),
    ("k-means", &[]),
    ("dbscan", &[]),
    ("dimensionality reduction", &[]),
    ("pca", &["principal component analysis"]),
    ("ensemble methods", &[]),
    ("hyperparameter tuning", &[]),
    ("grid search", &[]),
    ("random search", &[]),
    // Deep learning architectures
    ("neural networks", &["neural network", "ann"]),
    (
        "convolutional neural networks",
        &["cnn", "convolutional neural network"],
    ),
    (
        "recurrent neural networks",
        &["rnn", "recurrent neural network"],
    ),
    ("lstm", &[]),
    ("gru", &[]),
    ("transformers", &["transformer"]),
    ("bert", &[]),
    ("vision transformer", &["vit"]),
    // ML / DL frameworks
    ("pytorch", &["torch"]),
    ("tensorflow", &["tf"]),
    ("keras", &[]),
    ("fastai", &[]),
    ("scikit-learn", &["sklearn"]),
    // Generative AI and LLMs
    ("generative ai", &["genai"]),
    ("large language models", &["llm", "llms"]),
    ("retrieval augmented generation", &["rag"]),
    ("langchain", &[]),
    ("llamaindex", &[]),
    ("hugging face", &["huggingface"]),
    ("prompt engineering", &[]),
    ("fine tuning", &["finetuning"]),
    ("lora", &[]),
    ("qlora", &[]),
    ("openai api", &[]),
    ("stable diffusion", &[]),
    // NLP techniques and libraries
    ("nlu", &[]),
    ("nlg", &[]),
    ("tf-idf", &["tfidf"]),
    ("bag of words", &["bow"]),
    ("word embeddings", &[]),
    ("word2vec", &[]),
    ("glove", &[]),
    ("text similarity", &[]),
    ("cosine similarity", &[]),
    ("sentiment analysis", &[]),
    ("named entity recognition", &["ner"]),
    ("tokenization", &[]),
    ("lemmatization", &[]),
    ("spacy", &[]),
    ("nltk", &[]),
    ("gensim", &[]),
    // Computer vision tools
    ("opencv", &[]),
    ("image processing", &[]),
    ("object detection", &[]),
    ("yolo", &[]),
    ("image segmentation", &[]),
    ("ocr", &[]),
    // Data engineering and databases
    ("sql", &[]),
    ("mysql", &[]),
    ("postgresql", &["postgres"]),
    ("sqlite", &[]),
    ("oracle", &[]),
    ("sql server", &[]),
    ("nosql", &[]),
    ("mongodb", &[]),
    ("redis", &[]),
    ("cassandra", &[]),
    ("dynamodb", &[]),
    ("data warehouse", &[]),
    ("data lake", &[]),
    ("apache spark", &["spark"]),
    ("pyspark", &[]),
    ("hadoop", &[]),
    ("kafka", &[]),
    ("airflow", &[]),
    ("etl", &[]),
    ("elt", &[]),
    ("databricks", &[]),
    ("snowflake", &[]),
    ("bigquery", &[]),
    ("redshift", &[]),
    // MLOps and DevOps
    ("mlops", &[]),
    ("model deployment", &[]),
    ("model serving", &[]),
    ("model monitoring", &[]),
    ("ml pipeline", &[]),
    ("mlflow", &[]),
    ("wandb", &["weights and biases"]),
    ("kubeflow", &[]),
    ("ray", &[]),
    ("triton", &[]),
    ("docker", &[]),
    ("kubernetes", &["k8s"]),
    ("containerization", &[]),
    // Backend, frontend, cloud
    ("fastapi", &[]),
    ("django", &[]),
    ("flask", &[]),
    ("spring boot", &[]),
    ("node.js", &["nodejs"]),
    ("express.js", &["expressjs"]),
    ("graphql", &[]),
    ("grpc", &[]),
    ("rest api", &["restful api", "rest apis", "restful apis"]),
    ("websockets", &[]),
    ("microservices", &[]),
    ("serverless", &[]),
    ("aws lambda", &[]),
    ("react", &["react js", "reactjs"]),
    ("angular", &[]),
    ("vue", &["vue js", "vuejs"]),
    ("next.js", &["nextjs"]),
    ("redux", &[]),
    ("tailwind css", &[]),
    ("bootstrap", &[]),
    ("material ui", &[]),
    ("aws", &["amazon web services"]),
    ("azure", &["azure machine learning"]),
    ("gcp", &["google cloud platform"]),
    ("vertex ai", &[]),
];
