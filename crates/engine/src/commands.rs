// Palette flows: the three interactive entry points built on top of the
// prompt seam, the repository, and the search adapter.

use patternstore_common::types::{Pattern, StoredPattern, Tier};
use tracing::info;

use crate::bridge::SettingsBridge;
use crate::error::StoreError;
use crate::search::{self, LoadOutcome, SearchHost};
use crate::store::PatternRepository;
use crate::ui::{validate_label, Choice, PromptUi, TextPrompt};

const LABEL_PLACEHOLDER: &str = "e.g., \"Replace quotes with angles\"";
const FIND_PREVIEW_CHARS: usize = 50;

/// Result of the save-selection flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveFlowOutcome {
    Saved(Pattern),
    NoSelection,
    Cancelled,
}

/// Result of the interactive load flow. `Loaded` carries the label of the
/// pattern that was handed to the search host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadFlowOutcome {
    Loaded(String),
    NoPatterns,
    Cancelled,
}

/// Result of the interactive manage flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ManageFlowOutcome {
    Renamed { from: String, to: String },
    Deleted(String),
    NoPatterns,
    Cancelled,
}

/// Capture the current selection as a new pattern: name it, pick a tier,
/// and persist. Saving under a label that already exists in the chosen tier
/// asks before overwriting and then updates that entry in place.
pub async fn save_selection_as_pattern<B, U>(
    repo: &PatternRepository<B>,
    ui: &U,
) -> Result<SaveFlowOutcome, StoreError>
where
    B: SettingsBridge,
    U: PromptUi,
{
    let Some(selection) = ui.selected_text().await.filter(|text| !text.is_empty()) else {
        return Ok(SaveFlowOutcome::NoSelection);
    };

    let request = TextPrompt::new("Enter a name for this pattern")
        .with_placeholder(LABEL_PLACEHOLDER)
        .with_validator(validate_label);
    let Some(label) = ui.prompt_text(request).await else {
        return Ok(SaveFlowOutcome::Cancelled);
    };

    let choices = [
        Choice::new("Global", "Available in all workspaces"),
        Choice::new("Workspace", "Only for this workspace"),
    ];
    let tier = match ui.prompt_choice("Choose storage scope", &choices).await {
        Some(0) => Tier::Global,
        Some(_) => Tier::Workspace,
        None => return Ok(SaveFlowOutcome::Cancelled),
    };

    // Overwriting keeps the existing entry's id and position.
    let existing_id = repo
        .list_tier(tier)
        .await?
        .into_iter()
        .find(|p| p.label == label)
        .map(|p| p.id);
    if existing_id.is_some() {
        let message = format!("A pattern named \"{label}\" already exists. Overwrite?");
        if !ui.confirm(&message, "Overwrite").await {
            return Ok(SaveFlowOutcome::Cancelled);
        }
    }

    let draft = StoredPattern {
        id: existing_id,
        label,
        find: selection,
        ..StoredPattern::default()
    };
    let saved = repo.save(tier, draft).await?;
    info!(%tier, label = %saved.label, "selection saved as pattern");
    Ok(SaveFlowOutcome::Saved(saved))
}

/// Pick a pattern from both tiers and load it into the search panel.
pub async fn load_pattern_interactive<B, U, H>(
    repo: &PatternRepository<B>,
    ui: &U,
    host: &H,
) -> Result<LoadFlowOutcome, StoreError>
where
    B: SettingsBridge,
    U: PromptUi,
    H: SearchHost,
{
    let lists = repo.list_all().await?;
    if lists.is_empty() {
        return Ok(LoadFlowOutcome::NoPatterns);
    }

    let entries: Vec<(Tier, Pattern)> =
        lists.ordered().map(|(tier, p)| (tier, p.clone())).collect();
    let choices: Vec<Choice> = entries
        .iter()
        .map(|(tier, p)| Choice::new(&p.label, pattern_description(*tier, p)))
        .collect();

    let Some(index) = ui.prompt_choice("Select a pattern to load", &choices).await else {
        return Ok(LoadFlowOutcome::Cancelled);
    };
    let (_, pattern) = &entries[index];

    match search::load_pattern(ui, host, pattern).await {
        LoadOutcome::Loaded => Ok(LoadFlowOutcome::Loaded(pattern.label.clone())),
        LoadOutcome::Cancelled => Ok(LoadFlowOutcome::Cancelled),
    }
}

/// Pick a pattern, then rename or delete it.
pub async fn manage_patterns_interactive<B, U>(
    repo: &PatternRepository<B>,
    ui: &U,
) -> Result<ManageFlowOutcome, StoreError>
where
    B: SettingsBridge,
    U: PromptUi,
{
    let lists = repo.list_all().await?;
    if lists.is_empty() {
        return Ok(ManageFlowOutcome::NoPatterns);
    }

    let entries: Vec<(Tier, Pattern)> =
        lists.ordered().map(|(tier, p)| (tier, p.clone())).collect();
    let choices: Vec<Choice> = entries
        .iter()
        .map(|(tier, p)| Choice::new(&p.label, pattern_description(*tier, p)))
        .collect();

    let Some(index) = ui.prompt_choice("Select a pattern to manage", &choices).await else {
        return Ok(ManageFlowOutcome::Cancelled);
    };
    let (tier, pattern) = entries[index].clone();

    let actions = [
        Choice::new("Rename", "Change the pattern's name"),
        Choice::new("Delete", "Remove the pattern"),
    ];
    match ui.prompt_choice(&format!("\"{}\"", pattern.label), &actions).await {
        Some(0) => {
            let request = TextPrompt::new("Enter a new name")
                .with_initial(&pattern.label)
                .with_validator(validate_label);
            let Some(new_label) = ui.prompt_text(request).await else {
                return Ok(ManageFlowOutcome::Cancelled);
            };
            if new_label == pattern.label {
                return Ok(ManageFlowOutcome::Cancelled);
            }
            repo.rename(tier, &pattern.id, &new_label).await?;
            Ok(ManageFlowOutcome::Renamed { from: pattern.label, to: new_label })
        }
        Some(_) => {
            let message = format!("Delete pattern \"{}\"?", pattern.label);
            if !ui.confirm(&message, "Delete").await {
                return Ok(ManageFlowOutcome::Cancelled);
            }
            let label = repo.delete(tier, &pattern.id).await?;
            Ok(ManageFlowOutcome::Deleted(label))
        }
        None => Ok(ManageFlowOutcome::Cancelled),
    }
}

fn pattern_description(tier: Tier, pattern: &Pattern) -> String {
    let scope = match tier {
        Tier::Workspace => "Workspace",
        Tier::Global => "Global",
    };
    let mut preview: String = pattern.find.chars().take(FIND_PREVIEW_CHARS).collect();
    if pattern.find.chars().count() > FIND_PREVIEW_CHARS {
        preview.push('\u{2026}');
    }
    format!("[{scope}] {preview}")
}
