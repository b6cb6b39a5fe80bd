pub mod classifier_llm;
pub mod ideas_llm;
pub mod identity;
pub mod storage;

pub use classifier_llm::OpenAiClassifierAdapter;
pub use ideas_llm::OpenAiReuseIdeasAdapter;
pub use identity::LocalIdentityAdapter;
pub use storage::FileStorageAdapter;
