use color_eyre::eyre::eyre;
use color_eyre::Result;
use dialoguer::{Password, Select};

/// Prompt for a secret (masked input)
pub fn prompt_password(prompt: &str) -> Result<String> {
    Password::new()
        .with_prompt(prompt)
        .allow_empty_password(true)
        .interact()
        .map_err(|e| eyre!("Failed to read input: {}", e))
}

/// Pick one of `items`. `None` when the prompt is cancelled with Esc or q.
pub fn prompt_select(prompt: &str, items: &[String]) -> Result<Option<usize>> {
    Select::new()
        .with_prompt(prompt)
        .items(items)
        .default(0)
        .interact_opt()
        .map_err(|e| eyre!("Failed to read selection: {}", e))
}
