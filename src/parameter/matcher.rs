use tracing::trace;

use crate::{
    command::{CommandError, Locale},
    reader::{ReaderRegistry, Value, ValueType},
};

use super::{ArgumentOrigin, IndexedGroup, ParameterSpec, ParsedArgument};

/// Result of matching tokens against a [`ParameterSpec`].
#[derive(Debug, Clone, Default)]
pub struct MatchOutcome {
    arguments: Vec<ParsedArgument>,
    next_group: usize,
    greedy_group: Option<usize>,
    partial: Option<(usize, usize)>,
}

impl MatchOutcome {
    /// The parsed arguments in input order.
    pub fn arguments(&self) -> &[ParsedArgument] {
        &self.arguments
    }

    /// Consumes the outcome, returning the parsed arguments.
    pub fn into_arguments(self) -> Vec<ParsedArgument> {
        self.arguments
    }

    /// The slot the next positional token would land in, as
    /// `(group, slot)` indices.
    pub fn pending_slot(&self, spec: &ParameterSpec) -> Option<(usize, usize)> {
        if let Some(partial) = self.partial {
            return Some(partial);
        }
        if let Some(group) = self.greedy_group {
            return Some((group, 0));
        }
        (self.next_group < spec.indexed().len()).then_some((self.next_group, 0))
    }
}

/// Single pass, first-match-wins assignment of tokens to parameters.
///
/// At each token a flag is tried first, then a named parameter whose name the
/// token spells, then the indexed groups in declaration order. A token that
/// names an eligible flag or named parameter is never taken as a positional
/// value, so such tokens interrupt a greedy group.
#[derive(Debug)]
pub struct ArgumentMatcher<'a> {
    spec: &'a ParameterSpec,
    readers: &'a ReaderRegistry,
    locale: &'a Locale,
    lenient: bool,
}

struct MatchState<'t> {
    tokens: &'t [String],
    position: usize,
    outcome: MatchOutcome,
}

impl MatchState<'_> {
    fn current(&self) -> &str {
        &self.tokens[self.position]
    }
}

enum Eligibility {
    Eligible,
    Short,
}

impl<'a> ArgumentMatcher<'a> {
    /// Creates a matcher for `spec`.
    pub fn new(spec: &'a ParameterSpec, readers: &'a ReaderRegistry, locale: &'a Locale) -> Self {
        Self {
            spec,
            readers,
            locale,
            lenient: false,
        }
    }

    /// Lets fixed groups stop short at the end of input instead of failing.
    /// Used when completing a partially typed command line.
    #[must_use]
    pub fn lenient(mut self, lenient: bool) -> Self {
        self.lenient = lenient;
        self
    }

    /// Matches `tokens`.
    ///
    /// # Errors
    ///
    /// * [`CommandError::TooFewArguments`] - a required group needs more
    ///   tokens than remain
    /// * [`CommandError::TooManyArguments`] - positional tokens remain after
    ///   every indexed group was used
    /// * [`CommandError::ArgumentParse`] - an unknown flag or a named
    ///   parameter without its value
    /// * [`CommandError::InvalidArgument`] - a reader rejected a token
    pub fn run(&self, tokens: &[String]) -> Result<MatchOutcome, CommandError> {
        let mut state = MatchState {
            tokens,
            position: 0,
            outcome: MatchOutcome::default(),
        };

        while state.position < tokens.len() {
            if let Some(flag) = self.flag_at(&state, state.position) {
                let token = state.current().to_string();
                trace!(flag = self.spec.flags()[flag].long_name(), "Matched flag");
                state.outcome.arguments.push(ParsedArgument::new(
                    ArgumentOrigin::Flag(flag),
                    Value::String(token.clone()),
                    token,
                ));
                state.position += 1;
                continue;
            }

            if let Some(named) = self.named_at(&state, state.position) {
                self.parse_named(&mut state, named)?;
                continue;
            }

            self.match_indexed(&mut state)?;
        }

        Ok(state.outcome)
    }

    fn flag_at(&self, state: &MatchState<'_>, position: usize) -> Option<usize> {
        let token = state.tokens.get(position)?;
        self.spec.flags().iter().position(|flag| flag.matches(token))
    }

    fn named_at(&self, state: &MatchState<'_>, position: usize) -> Option<usize> {
        let token = state.tokens.get(position)?;
        let trailing = state.tokens.len() - position - 1;
        self.spec
            .named()
            .iter()
            .position(|param| param.matches_name(token) && trailing >= param.greed_count())
    }

    fn is_marker(&self, state: &MatchState<'_>, position: usize) -> bool {
        self.flag_at(state, position).is_some() || self.named_at(state, position).is_some()
    }

    /// Positional tokens available before the next flag or named parameter.
    fn run_length(&self, state: &MatchState<'_>) -> usize {
        (state.position..state.tokens.len())
            .take_while(|position| !self.is_marker(state, *position))
            .count()
    }

    /// Positional tokens from the current one to the end of input. Flags and
    /// named parameters, value tokens included, do not count.
    fn positional_left(&self, state: &MatchState<'_>) -> usize {
        let mut position = state.position;
        let mut count = 0;
        while position < state.tokens.len() {
            if self.flag_at(state, position).is_some() {
                position += 1;
            } else if let Some(named) = self.named_at(state, position) {
                position += 1 + self.spec.named()[named].greed_count();
            } else {
                count += 1;
                position += 1;
            }
        }
        count
    }

    /// Tokens the required groups after `group` still need.
    fn reserved_after(&self, group: usize) -> usize {
        self.spec.indexed()[group + 1..]
            .iter()
            .filter(|g| g.is_required())
            .map(IndexedGroup::tokens_needed)
            .sum()
    }

    fn eligibility(&self, state: &MatchState<'_>, index: usize, available: usize) -> Eligibility {
        let group = &self.spec.indexed()[index];
        let fits = if group.is_greedy() {
            available >= 1 && self.positional_left(state) > self.reserved_after(index)
        } else if self.lenient {
            available >= 1
        } else {
            available >= group.tokens_needed()
        };

        if fits {
            Eligibility::Eligible
        } else {
            Eligibility::Short
        }
    }

    fn match_indexed(&self, state: &mut MatchState<'_>) -> Result<(), CommandError> {
        let available = self.run_length(state);

        if let Some(index) = state.outcome.greedy_group {
            match self.eligibility(state, index, available) {
                Eligibility::Eligible => return self.parse_greedy(state, index),
                Eligibility::Short => state.outcome.greedy_group = None,
            }
        }

        let mut short = false;
        for index in state.outcome.next_group..self.spec.indexed().len() {
            let group = &self.spec.indexed()[index];
            match self.eligibility(state, index, available) {
                Eligibility::Eligible => {
                    state.outcome.next_group = index + 1;
                    if group.is_greedy() {
                        state.outcome.greedy_group = Some(index);
                        return self.parse_greedy(state, index);
                    }
                    return self.parse_fixed(state, index, available);
                }
                Eligibility::Short if group.is_required() => {
                    short = true;
                    break;
                }
                Eligibility::Short => short = short || (available > 0 && !group.is_greedy()),
            }
        }

        let token = state.current().to_string();
        if short {
            Err(CommandError::TooFewArguments)
        } else if self.looks_like_option(&token) {
            Err(CommandError::ArgumentParse { token })
        } else {
            Err(CommandError::TooManyArguments)
        }
    }

    /// Unknown `-x` switches and named parameters missing their value.
    fn looks_like_option(&self, token: &str) -> bool {
        let dashed = token.starts_with('-') && token.parse::<f64>().is_err();
        dashed || self.spec.find_named(token).is_some()
    }

    fn parse_fixed(
        &self,
        state: &mut MatchState<'_>,
        index: usize,
        available: usize,
    ) -> Result<(), CommandError> {
        let group = &self.spec.indexed()[index];
        let mut left = available;

        for (slot_index, slot) in group.slots().iter().enumerate() {
            let required_after = (slot_index + 1..group.slots().len())
                .filter(|i| group.slot_required(*i))
                .count();
            let take = left > 0 && (group.slot_required(slot_index) || left > required_after);
            if !take {
                if left == 0 && self.lenient {
                    state.outcome.partial = Some((index, slot_index));
                    return Ok(());
                }
                continue;
            }

            let token = state.current().to_string();
            let value = self.read_any(slot.types(), &token)?;
            trace!(group = index, slot = slot_index, token = %token, "Matched indexed slot");
            state.outcome.arguments.push(ParsedArgument::new(
                ArgumentOrigin::Indexed {
                    group: index,
                    slot: slot_index,
                },
                value,
                token,
            ));
            state.position += 1;
            left -= 1;
        }

        state.outcome.partial = None;
        Ok(())
    }

    fn parse_greedy(&self, state: &mut MatchState<'_>, index: usize) -> Result<(), CommandError> {
        let slot = &self.spec.indexed()[index].slots()[0];
        let origin = ArgumentOrigin::Indexed {
            group: index,
            slot: 0,
        };
        let token = state.current().to_string();
        state.position += 1;

        let merge = state
            .outcome
            .arguments
            .last()
            .is_some_and(|last| last.origin() == origin);

        let raw = if merge {
            let last = state.outcome.arguments.pop();
            match last {
                Some(last) => format!("{} {}", last.raw(), token),
                None => token,
            }
        } else {
            token
        };

        let value = self.read_any(slot.types(), &raw)?;
        trace!(group = index, raw = %raw, merged = merge, "Matched greedy group");
        state
            .outcome
            .arguments
            .push(ParsedArgument::new(origin, value, raw));
        Ok(())
    }

    fn parse_named(&self, state: &mut MatchState<'_>, index: usize) -> Result<(), CommandError> {
        let param = &self.spec.named()[index];
        let name_token = state.current().to_string();
        state.position += 1;

        let raw = if param.greed_count() == 0 {
            name_token
        } else {
            let end = state.position + param.greed_count();
            let joined = state.tokens[state.position..end].join(" ");
            state.position = end;
            joined
        };

        let value = self.read_any(&[param.value_type()], &raw)?;
        trace!(parameter = param.name(), raw = %raw, "Matched named parameter");
        state
            .outcome
            .arguments
            .push(ParsedArgument::new(ArgumentOrigin::Named(index), value, raw));
        Ok(())
    }

    /// Reads `input` with the first type whose reader accepts it.
    fn read_any(&self, types: &[ValueType], input: &str) -> Result<Value, CommandError> {
        let mut first_error = None;
        for ty in types {
            match self.readers.read(ty, input, self.locale) {
                Ok(value) => return Ok(value),
                Err(source) if first_error.is_none() => {
                    first_error = Some(CommandError::InvalidArgument {
                        value_type: *ty,
                        source,
                    });
                }
                Err(_) => {}
            }
        }
        Err(first_error.unwrap_or_else(|| CommandError::ArgumentParse {
            token: input.to_string(),
        }))
    }
}
