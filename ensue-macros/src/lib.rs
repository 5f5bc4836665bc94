mod utils;

use proc_macro::TokenStream;

/// Joins tasks of different result types.
///
/// `join!(a, b, c)` evaluates each argument once, in order, and returns a
/// `Task<(A, B, C)>` that succeeds with the cloned results once every input
/// has succeeded. Faults and cancellation follow
/// [`join_all`](../ensue/fn.join_all.html). `join!()` is an already
/// succeeded `Task<()>`.
#[proc_macro]
pub fn join(input: TokenStream) -> TokenStream {
    let args = utils::split_args(input);
    let count = args.len();

    if count == 0 {
        return "::ensue::Task::from_result(())".parse().unwrap();
    }

    let mut output = String::new();
    output.push_str("{\n");

    for (i, expr_tokens) in args.iter().enumerate() {
        let idx = i + 1;
        let expr = utils::tokens_to_string(expr_tokens);
        output.push_str(&format!("let __t{idx} = {expr};\n"));
    }

    let ignored = (1..=count)
        .map(|i| format!("__t{i}.ignore_result()"))
        .collect::<Vec<_>>()
        .join(", ");

    let results = (1..=count)
        .map(|i| format!("__t{i}.result()"))
        .collect::<Vec<_>>()
        .join(", ");

    let bindings = (1..=count)
        .map(|i| format!("::core::option::Option::Some(__v{i})"))
        .collect::<Vec<_>>()
        .join(", ");

    let clones = (1..=count)
        .map(|i| format!("::core::clone::Clone::clone(__v{i}),"))
        .collect::<Vec<_>>()
        .join(" ");

    output.push_str(&format!(
        "::ensue::join_all(::std::vec![{ignored}])\n\
            .continue_with_success_on(::ensue::executor::immediate(), move |_: &()| {{\n\
                match ({results},) {{\n\
                    ({bindings},) => ::ensue::Outcome::Succeeded(({clones})),\n\
                    _ => ::ensue::Outcome::Cancelled,\n\
                }}\n\
            }})\n"
    ));

    output.push_str("}\n");

    match output.parse::<TokenStream>() {
        Ok(ts) => ts,
        Err(err) => {
            let msg = format!("join macro error: {}", err);
            format!("compile_error!({:?});", msg).parse().unwrap()
        }
    }
}
