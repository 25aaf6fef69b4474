use chrono::{DateTime, Utc};

use crate::{
    errors::{AppError, AppResult},
    models::domain::{Question, Session},
    services::{pagination::PageSize, quiz_runtime::Action},
};

/// One line typed at the quiz prompt.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ShellCommand {
    Select { number: usize, letter: char },
    SetAnswer { number: usize, letters: Vec<char> },
    Reveal(usize),
    Clear(usize),
    ClearPage,
    ConfirmPage,
    ConfirmAll,
    Back,
    First,
    Prev,
    Next,
    Last,
    PageSize(PageSize),
    Detail(usize),
    Timer,
    Restart,
    Help,
    Quit,
}

pub const HELP: &str = "\
Commands:
  a <n> <letter>    select an option (toggles on multi-answer questions)
  s <n> <letters>   set the full answer, e.g. `s 3 ac`
  r <n>             reveal the answer to question n
  c <n>             clear question n
  cp                clear every question on this page
  p                 check this page
  done              finish and show the summary
  f | b | n | l     first / previous / next / last page
  size <n>          questions per page (1, 5, 10, 20, 50)
  d <n>             question detail
  back              return from the summary to the questions
  t                 show the timer
  restart           start again with the same settings
  h                 this help
  q                 quit";

fn invalid(message: impl Into<String>) -> AppError {
    AppError::InvalidParameter(message.into())
}

fn parse_number(token: Option<&str>, command: &str) -> AppResult<usize> {
    let token = token.ok_or_else(|| invalid(format!("'{}' needs a question number", command)))?;
    token
        .parse::<usize>()
        .map_err(|_| invalid(format!("'{}' is not a question number", token)))
}

fn parse_letters(tokens: &[&str]) -> AppResult<Vec<char>> {
    let letters: Vec<char> = tokens
        .iter()
        .flat_map(|token| token.chars())
        .filter(|c| *c != ',')
        .map(|c| c.to_ascii_lowercase())
        .collect();

    if let Some(bad) = letters.iter().find(|c| !c.is_ascii_lowercase()) {
        return Err(invalid(format!("'{}' is not an option letter", bad)));
    }
    Ok(letters)
}

fn expect_end(tokens: &[&str], command: &str) -> AppResult<()> {
    if tokens.is_empty() {
        Ok(())
    } else {
        Err(invalid(format!(
            "unexpected '{}' after '{}'",
            tokens.join(" "),
            command
        )))
    }
}

/// Parses a prompt line. Blank lines yield `None`.
pub fn parse_command(line: &str) -> AppResult<Option<ShellCommand>> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    let Some((&head, rest)) = tokens.split_first() else {
        return Ok(None);
    };
    let head = head.to_ascii_lowercase();

    let command = match head.as_str() {
        "a" => {
            let number = parse_number(rest.first().copied(), "a")?;
            let letters = parse_letters(rest.get(1..).unwrap_or_default())?;
            match letters.as_slice() {
                [letter] => ShellCommand::Select {
                    number,
                    letter: *letter,
                },
                _ => return Err(invalid("'a' takes exactly one option letter")),
            }
        }
        "s" => {
            let number = parse_number(rest.first().copied(), "s")?;
            let letters = parse_letters(rest.get(1..).unwrap_or_default())?;
            if letters.is_empty() {
                return Err(invalid("'s' needs at least one option letter; use 'c' to clear"));
            }
            ShellCommand::SetAnswer { number, letters }
        }
        "r" | "c" | "d" => {
            let number = parse_number(rest.first().copied(), &head)?;
            expect_end(rest.get(1..).unwrap_or_default(), &head)?;
            match head.as_str() {
                "r" => ShellCommand::Reveal(number),
                "c" => ShellCommand::Clear(number),
                _ => ShellCommand::Detail(number),
            }
        }
        "size" => {
            let raw = rest
                .first()
                .ok_or_else(|| invalid("'size' needs a page size"))?;
            let size = raw
                .parse::<usize>()
                .map_err(|_| invalid(format!("'{}' is not a page size", raw)))?;
            expect_end(&rest[1..], "size")?;
            ShellCommand::PageSize(PageSize::try_from(size)?)
        }
        other => {
            expect_end(rest, other)?;
            match other {
                "cp" => ShellCommand::ClearPage,
                "p" => ShellCommand::ConfirmPage,
                "done" => ShellCommand::ConfirmAll,
                "back" => ShellCommand::Back,
                "f" => ShellCommand::First,
                "b" => ShellCommand::Prev,
                "n" => ShellCommand::Next,
                "l" => ShellCommand::Last,
                "t" => ShellCommand::Timer,
                "restart" => ShellCommand::Restart,
                "h" | "help" | "?" => ShellCommand::Help,
                "q" | "quit" | "exit" => ShellCommand::Quit,
                unknown => {
                    return Err(invalid(format!(
                        "unknown command '{}' (type h for help)",
                        unknown
                    )))
                }
            }
        }
    };

    Ok(Some(command))
}

/// Letters address options by displayed position: `a` is the first option shown.
pub fn option_letter(position: usize) -> char {
    (b'a' + (position % 26) as u8) as char
}

fn question_at(session: &Session, number: usize) -> AppResult<&Question> {
    session.question_by_number(number).ok_or_else(|| {
        AppError::NotFound(format!(
            "question number {} (this quiz has {})",
            number,
            session.question_count()
        ))
    })
}

fn option_for(question: &Question, number: usize, letter: char) -> AppResult<String> {
    let position = (letter as u8).wrapping_sub(b'a') as usize;
    question
        .option_at(position)
        .map(|option| option.id.clone())
        .ok_or_else(|| {
            AppError::NotFound(format!("question {} has no option '{}'", number, letter))
        })
}

/// Maps a quiz command onto a runtime action. Commands the shell handles
/// itself (timer, restart, help, quit) yield `None`.
pub fn to_action(
    command: &ShellCommand,
    session: &Session,
    now: DateTime<Utc>,
) -> AppResult<Option<Action>> {
    let action = match command {
        ShellCommand::Select { number, letter } => {
            let question = question_at(session, *number)?;
            Action::SelectOption {
                question_id: question.id.clone(),
                option_id: option_for(question, *number, *letter)?,
            }
        }
        ShellCommand::SetAnswer { number, letters } => {
            let question = question_at(session, *number)?;
            let option_ids = letters
                .iter()
                .map(|letter| option_for(question, *number, *letter))
                .collect::<AppResult<Vec<_>>>()?;
            Action::SetAnswer {
                question_id: question.id.clone(),
                option_ids,
            }
        }
        ShellCommand::Reveal(number) => Action::Reveal {
            question_id: question_at(session, *number)?.id.clone(),
        },
        ShellCommand::Clear(number) => Action::ClearQuestion {
            question_id: question_at(session, *number)?.id.clone(),
        },
        ShellCommand::ClearPage => Action::ClearPage,
        ShellCommand::ConfirmPage => Action::ConfirmPage,
        ShellCommand::ConfirmAll => Action::ConfirmAll { now },
        ShellCommand::Back => Action::BackToQuiz,
        ShellCommand::First => Action::FirstPage,
        ShellCommand::Prev => Action::PrevPage,
        ShellCommand::Next => Action::NextPage,
        ShellCommand::Last => Action::LastPage,
        ShellCommand::PageSize(size) => Action::SetPageSize(*size),
        ShellCommand::Detail(number) => Action::ShowDetail { number: *number },
        ShellCommand::Timer | ShellCommand::Restart | ShellCommand::Help | ShellCommand::Quit => {
            return Ok(None)
        }
    };

    Ok(Some(action))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::fixtures::sample_session;
    use chrono::TimeZone;

    fn parse(line: &str) -> ShellCommand {
        parse_command(line).unwrap().unwrap()
    }

    #[test]
    fn parses_answer_commands() {
        assert_eq!(
            parse("a 3 B"),
            ShellCommand::Select {
                number: 3,
                letter: 'b'
            }
        );
        assert_eq!(
            parse("s 11 a,c"),
            ShellCommand::SetAnswer {
                number: 11,
                letters: vec!['a', 'c']
            }
        );
        assert_eq!(
            parse("s 11 a c"),
            ShellCommand::SetAnswer {
                number: 11,
                letters: vec!['a', 'c']
            }
        );
        assert_eq!(parse("r 2"), ShellCommand::Reveal(2));
        assert_eq!(parse("c 2"), ShellCommand::Clear(2));
        assert_eq!(parse("d 7"), ShellCommand::Detail(7));
    }

    #[test]
    fn parses_bare_commands() {
        assert_eq!(parse("cp"), ShellCommand::ClearPage);
        assert_eq!(parse("p"), ShellCommand::ConfirmPage);
        assert_eq!(parse("  DONE "), ShellCommand::ConfirmAll);
        assert_eq!(parse("n"), ShellCommand::Next);
        assert_eq!(parse("size 20"), ShellCommand::PageSize(PageSize::Twenty));
        assert_eq!(parse("?"), ShellCommand::Help);
        assert_eq!(parse("q"), ShellCommand::Quit);
    }

    #[test]
    fn blank_line_is_nothing() {
        assert_eq!(parse_command("   ").unwrap(), None);
    }

    #[test]
    fn malformed_commands_are_invalid_parameters() {
        for line in ["a", "a x b", "a 1", "a 1 bc", "s 1", "r", "size 7", "p 2", "zap", "a 1 3"] {
            assert!(
                matches!(parse_command(line), Err(AppError::InvalidParameter(_))),
                "'{}' should be rejected",
                line
            );
        }
    }

    #[test]
    fn option_letters_follow_display_order() {
        assert_eq!(option_letter(0), 'a');
        assert_eq!(option_letter(3), 'd');
    }

    #[test]
    fn resolves_numbers_and_letters_to_ids() {
        let session = sample_session();
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap();

        let action = to_action(&parse("a 12 b"), &session, now).unwrap();
        assert_eq!(
            action,
            Some(Action::SelectOption {
                question_id: "q12".to_string(),
                option_id: "b".to_string()
            })
        );

        let action = to_action(&parse("s 11 c a"), &session, now).unwrap();
        assert_eq!(
            action,
            Some(Action::SetAnswer {
                question_id: "q11".to_string(),
                option_ids: vec!["c".to_string(), "a".to_string()]
            })
        );

        assert_eq!(
            to_action(&ShellCommand::ConfirmAll, &session, now).unwrap(),
            Some(Action::ConfirmAll { now })
        );
        assert_eq!(to_action(&ShellCommand::Timer, &session, now).unwrap(), None);
    }

    #[test]
    fn out_of_range_references_are_not_found() {
        let session = sample_session();
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap();

        assert!(matches!(
            to_action(&parse("r 13"), &session, now),
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            to_action(&parse("r 0"), &session, now),
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            to_action(&parse("a 1 e"), &session, now),
            Err(AppError::NotFound(_))
        ));
    }
}
