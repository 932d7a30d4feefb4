//! 行番号の除去と空行の除去

/// 行番号付きテキストかどうかの判定条件
///
/// 先頭 `window` 行のうち `threshold` 行以上が「数字 + 空白」で始まれば
/// 行番号付きとみなす。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineNumberHeuristic {
    pub window: usize,
    pub threshold: usize,
}

impl Default for LineNumberHeuristic {
    fn default() -> Self {
        Self {
            window: 24,
            threshold: 20,
        }
    }
}

impl LineNumberHeuristic {
    /// 先頭 `window` 行を調べて行番号付きかどうかを返す
    pub fn has_line_numbers(&self, text: &str) -> bool {
        let numbered = text
            .lines()
            .take(self.window)
            .filter(|line| starts_with_number(line))
            .count();
        numbered >= self.threshold
    }

    /// 行番号付きなら各行の先頭の数字トークンを除去し、空になった行を捨てる。
    /// そうでなければ空白のみの行だけを捨てる。
    pub fn clean(&self, text: &str) -> String {
        let numbered = self.has_line_numbers(text);
        let mut cleaned: Vec<&str> = Vec::new();

        for line in text.lines() {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }

            if numbered {
                match split_number(trimmed) {
                    Some(rest) if !rest.is_empty() => cleaned.push(rest),
                    Some(_) => {}
                    None => cleaned.push(line),
                }
            } else {
                cleaned.push(line);
            }
        }

        cleaned.join("\n")
    }
}

/// デフォルト条件（先頭24行中20行）で整形する
pub fn clean_source_code(text: &str) -> String {
    LineNumberHeuristic::default().clean(text)
}

fn is_number(token: &str) -> bool {
    !token.is_empty() && token.chars().all(|c| c.is_ascii_digit())
}

fn starts_with_number(line: &str) -> bool {
    line.split_whitespace().next().is_some_and(is_number)
}

/// 先頭トークンが数字なら残りの部分（先頭空白除去済み）を返す
fn split_number(trimmed: &str) -> Option<&str> {
    match trimmed.split_once(char::is_whitespace) {
        Some((token, rest)) if is_number(token) => Some(rest.trim_start()),
        None if is_number(trimmed) => Some(""),
        _ => None,
    }
}
