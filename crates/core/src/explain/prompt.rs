/// System instruction sent ahead of every explanation request.
pub const SYSTEM_INSTRUCTION: &str = "You are an expert programmer providing clear and concise explanations of code. Focus on the functionality and the 'how-it-works'.";

/// The two ordered messages that make up an explanation prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub system: String,
    pub human: String,
}

/// Build the system and human instructions for a code snippet.
///
/// The language names the snippet and tags the fenced block. Both `code` and
/// `language` are embedded verbatim, with no escaping of fences or of text that
/// reads like further instructions.
pub fn build_prompt(code: &str, language: &str) -> Prompt {
    let human = format!(
        "Please explain the following {language} code in a clear, concise way. \
         What does it do and how does it work?\n```{language}\n{code}\n```"
    );

    Prompt {
        system: SYSTEM_INSTRUCTION.to_string(),
        human,
    }
}

/// Guess a language label from a file extension.
///
/// Used when the CLI reads code from a file and no `--language` was given.
pub fn language_for_extension(extension: &str) -> Option<&'static str> {
    let language = match extension.to_ascii_lowercase().as_str() {
        "rs" => "rust",
        "py" => "python",
        "js" | "mjs" | "cjs" => "javascript",
        "ts" | "mts" | "cts" => "typescript",
        "jsx" => "jsx",
        "tsx" => "tsx",
        "go" => "go",
        "java" => "java",
        "kt" | "kts" => "kotlin",
        "rb" => "ruby",
        "php" => "php",
        "c" | "h" => "c",
        "cc" | "cpp" | "cxx" | "hpp" | "hh" => "cpp",
        "cs" => "csharp",
        "swift" => "swift",
        "sh" | "bash" | "zsh" => "bash",
        "sql" => "sql",
        "lua" => "lua",
        "hs" => "haskell",
        "ex" | "exs" => "elixir",
        "scala" => "scala",
        _ => return None,
    };

    Some(language)
}
