use serde::Serialize;
use toolgate_config::ServerConfig;
use toolgate_primitives::catalog::{self, ToolsetMetadata};
use toolgate_primitives::KnownToolsets;
use toolgate_prompts::InstructionComposer;

#[derive(Debug, Serialize)]
pub struct ResolveReport {
    pub enabled: Vec<String>,
    pub invalid: Vec<String>,
    pub read_only: bool,
    pub dynamic_toolsets: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
}

pub fn resolve(config: &ServerConfig, known: &KnownToolsets, instructions: bool) -> ResolveReport {
    let resolution = config.resolve_toolsets(known);
    let instructions = instructions.then(|| {
        InstructionComposer::new(config.disable_instructions).compose(&resolution.enabled)
    });
    ResolveReport {
        enabled: resolution.enabled,
        invalid: resolution.invalid,
        read_only: config.read_only,
        dynamic_toolsets: config.dynamic_toolsets,
        instructions,
    }
}

#[derive(Debug, Serialize)]
pub struct ToolsetEntry {
    #[serde(flatten)]
    pub metadata: ToolsetMetadata,
    pub default: bool,
}

pub fn toolsets(known: &KnownToolsets) -> Vec<ToolsetEntry> {
    known
        .ids()
        .iter()
        .filter_map(|id| catalog::metadata(id))
        .map(|metadata| ToolsetEntry {
            default: known.defaults().iter().any(|id| id == metadata.id),
            metadata,
        })
        .collect()
}
