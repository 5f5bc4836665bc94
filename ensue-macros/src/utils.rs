use proc_macro::{TokenStream, TokenTree};

/// Splits macro input on top-level commas.
///
/// Commas inside delimited groups belong to the group's own token tree and
/// are left alone, so `join!(f(a, b), g())` yields two arguments. Empty
/// arguments (a trailing comma) are dropped.
pub(crate) fn split_args(input: TokenStream) -> Vec<Vec<TokenTree>> {
    let mut args = Vec::new();
    let mut current = Vec::new();

    for token in input {
        match &token {
            TokenTree::Punct(p) if p.as_char() == ',' => {
                if !current.is_empty() {
                    args.push(std::mem::take(&mut current));
                }
            }
            _ => current.push(token),
        }
    }

    if !current.is_empty() {
        args.push(current);
    }

    args
}

/// Renders tokens back to source text.
///
/// A space follows every identifier that precedes another identifier or a
/// literal, so that `move x` does not turn into `movex`.
pub(crate) fn tokens_to_string(tokens: &[TokenTree]) -> String {
    let mut out = String::new();
    let mut prev_was_ident = false;

    for token in tokens {
        let is_ident = matches!(token, TokenTree::Ident(_));
        let is_word = is_ident || matches!(token, TokenTree::Literal(_));

        if prev_was_ident && is_word {
            out.push(' ');
        }

        out.push_str(&token.to_string());
        prev_was_ident = is_ident;
    }

    out
}
