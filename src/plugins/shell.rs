//! Shell integration: the cd hook that feeds `gozelle add` and the `gz`/`gzi`
//! jump functions.

use clap::ValueEnum;
use std::process::{Command, Stdio};
use tracing::debug;

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
}

impl From<Shell> for clap_complete::Shell {
    fn from(shell: Shell) -> Self {
        match shell {
            Shell::Bash => clap_complete::Shell::Bash,
            Shell::Zsh => clap_complete::Shell::Zsh,
            Shell::Fish => clap_complete::Shell::Fish,
        }
    }
}

/// Shared by bash and zsh.
const POSIX_JUMP_FUNCTIONS: &str = r#"gz() {
    if [ $# -eq 0 ]; then
        cd ~
    elif [ $# -eq 1 ] && [ "$1" = "-" ]; then
        cd "${OLDPWD}"
    elif [ $# -eq 1 ] && [ -d "$1" ]; then
        cd "$1"
    elif [ $# -eq 2 ] && [ "$1" = "--" ]; then
        cd "$2"
    else
        target="$(command gozelle query "$@")" && cd "$target"
    fi
}

gzi() {
    target="$(command gozelle interactive)" && cd "$target"
}"#;

const BASH_HOOK: &str = r#"# gozelle bash integration: eval "$(gozelle init bash)"

__gozelle_oldpwd="$(pwd)"

__gozelle_hook() {
    local retval=$?
    local pwd_now="$(pwd)"
    if [[ "$__gozelle_oldpwd" != "$pwd_now" ]]; then
        __gozelle_oldpwd="$pwd_now"
        command gozelle add "$pwd_now" >/dev/null 2>&1
    fi
    return $retval
}

if [[ "$PROMPT_COMMAND" != *"__gozelle_hook"* ]]; then
    PROMPT_COMMAND="__gozelle_hook;${PROMPT_COMMAND#;}"
fi"#;

const ZSH_HOOK: &str = r#"# gozelle zsh integration: eval "$(gozelle init zsh)"

__gozelle_on_cd() {
    command gozelle add "$PWD" >/dev/null 2>&1
}

autoload -Uz add-zsh-hook
add-zsh-hook chpwd __gozelle_on_cd"#;

const FISH_SCRIPT: &str = r#"# gozelle fish integration: gozelle init fish | source

function __gozelle_on_cd --on-variable PWD
    command gozelle add "$PWD" >/dev/null 2>&1
end

function gz
    set -l argc (count $argv)
    if test $argc -eq 0
        cd ~
    else if test $argc -eq 1; and test "$argv[1]" = "-"
        cd -
    else if test $argc -eq 1; and test -d "$argv[1]"
        cd "$argv[1]"
    else if test $argc -eq 2; and test "$argv[1]" = "--"
        cd "$argv[2]"
    else
        set -l target (command gozelle query $argv); and cd "$target"
    end
end

function gzi
    set -l target (command gozelle interactive); and cd "$target"
end"#;

pub fn init_script(shell: Shell) -> String {
    match shell {
        Shell::Bash => format!("{BASH_HOOK}\n\n{POSIX_JUMP_FUNCTIONS}"),
        Shell::Zsh => format!("{ZSH_HOOK}\n\n{POSIX_JUMP_FUNCTIONS}"),
        Shell::Fish => FISH_SCRIPT.to_string(),
    }
}

/// Starts `gozelle prune` as a detached child and returns without waiting.
///
/// Housekeeping only: failure to spawn is logged and otherwise ignored.
pub fn spawn_background_prune() {
    let exe = match std::env::current_exe() {
        Ok(exe) => exe,
        Err(e) => {
            debug!(error = %e, "cannot resolve own executable; skipping prune");
            return;
        }
    };
    match Command::new(&exe)
        .arg("prune")
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
    {
        Ok(child) => debug!(pid = child.id(), "background prune started"),
        Err(e) => debug!(error = %e, "background prune failed to start"),
    }
}
