// O núcleo puro de reconciliação do funil. Funções síncronas sobre
// dados já buscados; nenhum acesso a banco ou rede aqui dentro.

pub mod units;
pub mod normalizer;
pub mod classifier;
pub mod first_entry;
pub mod aggregator;
pub mod reconciler;
pub mod splitter;

pub use first_entry::FunnelIndex;
pub use units::SourceConfig;
