//! Builds the shell command run against the package manager when a new root
//! is materialized. Nothing here executes anything.

use crate::config::EngineConfig;

/// How much of the recorded state a transaction replays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Only the unstaged log.
    Apply,
    /// The full add and remove sets.
    Upgrade,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandSynthesizer {
    add_verb: String,
    remove_verb: String,
    pre_hook: Option<String>,
    post_hook: Option<String>,
}

impl CommandSynthesizer {
    pub fn new(add_verb: impl Into<String>, remove_verb: impl Into<String>) -> Self {
        Self {
            add_verb: add_verb.into(),
            remove_verb: remove_verb.into(),
            ..Default::default()
        }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self {
            add_verb: config.add_verb.trim().to_string(),
            remove_verb: config.remove_verb.trim().to_string(),
            pre_hook: config.pre_hook().map(str::to_string),
            post_hook: config.post_hook().map(str::to_string),
        }
    }

    pub fn with_hooks(mut self, pre: Option<&str>, post: Option<&str>) -> Self {
        self.pre_hook = pre.map(str::to_string);
        self.post_hook = post.map(str::to_string);
        self
    }

    /// Returns an empty string when there is nothing to do.
    pub fn synthesize<A, R>(&self, add: &[A], remove: &[R]) -> String
    where
        A: AsRef<str>,
        R: AsRef<str>,
    {
        let add = fragment(&self.add_verb, add);
        let remove = fragment(&self.remove_verb, remove);

        let cmd = match (add, remove) {
            (Some(add), Some(remove)) => format!("{add} && {remove}"),
            (Some(single), None) | (None, Some(single)) => single,
            (None, None) => return String::new(),
        };

        self.wrap(cmd)
    }

    fn wrap(&self, mut cmd: String) -> String {
        if let Some(pre) = &self.pre_hook {
            cmd = format!("{pre} && {cmd}");
        }
        if let Some(post) = &self.post_hook {
            cmd = format!("{cmd} && {post}");
        }
        cmd
    }
}

fn fragment<S: AsRef<str>>(verb: &str, names: &[S]) -> Option<String> {
    let names: Vec<&str> = names
        .iter()
        .map(|n| n.as_ref().trim())
        .filter(|n| !n.is_empty())
        .collect();
    if names.is_empty() {
        return None;
    }
    Some(format!("{verb} {}", names.join(" ")).trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const NONE: &[&str] = &[];

    #[test]
    fn empty_sets_give_empty_command() {
        let synth = CommandSynthesizer::new("install", "purge")
            .with_hooks(Some("lock"), Some("unlock"));
        assert_eq!(synth.synthesize(NONE, NONE), "");
    }

    #[test]
    fn add_only_preserves_order() {
        let synth = CommandSynthesizer::new("install", "purge");
        assert_eq!(synth.synthesize(&["vim", "git"], NONE), "install vim git");
    }

    #[test]
    fn remove_only() {
        let synth = CommandSynthesizer::new("install", "purge");
        assert_eq!(synth.synthesize(NONE, &["nano"]), "purge nano");
    }

    #[test]
    fn both_fragments_are_chained() {
        let synth = CommandSynthesizer::new("install", "purge");
        assert_eq!(
            synth.synthesize(&["vim"], &["nano"]),
            "install vim && purge nano"
        );
    }

    #[test]
    fn hooks_wrap_non_empty_commands() {
        let synth = CommandSynthesizer::new("install", "purge")
            .with_hooks(Some("lock"), Some("unlock"));
        assert_eq!(
            synth.synthesize(&["vim"], NONE),
            "lock && install vim && unlock"
        );

        let pre_only =
            CommandSynthesizer::new("install", "purge").with_hooks(Some("lock"), None);
        assert_eq!(pre_only.synthesize(&["vim"], NONE), "lock && install vim");

        let post_only =
            CommandSynthesizer::new("install", "purge").with_hooks(None, Some("unlock"));
        assert_eq!(post_only.synthesize(&["vim"], NONE), "install vim && unlock");
    }

    #[test]
    fn config_hooks_ignore_blanks() {
        let config = EngineConfig {
            add_verb: "apt-get install -y".to_string(),
            remove_verb: "apt-get purge -y".to_string(),
            pre_hook: Some(String::new()),
            post_hook: Some("sync".to_string()),
            ..Default::default()
        };
        let synth = CommandSynthesizer::from_config(&config);
        assert_eq!(
            synth.synthesize(&["vim"], &["nano"]),
            "apt-get install -y vim && apt-get purge -y nano && sync"
        );
    }
}
