//! Console mode integration tests.
//!
//! Exercises the full parse/dispatch path through the public API.

use std::sync::Arc;

use pretty_assertions::assert_eq;
use tilegame_server::commands::{builtin_registry, register_builtins, Registry};
use tilegame_server::console::run_console;
use tilegame_server::interpreter::Interpreter;

async fn run_with(interpreter: &Interpreter, input: &str) -> String {
    let mut output = Vec::new();
    run_console(interpreter, input.as_bytes(), &mut output)
        .await
        .unwrap();
    String::from_utf8(output).unwrap()
}

#[tokio::test]
async fn test_session_transcript() {
    let interpreter = Interpreter::new(Arc::new(builtin_registry(3)));
    let output = run_with(
        &interpreter,
        "login(alice)\n\
         add( 1.5 , 2 )\n\
         {\"Name\":\"sum\",\"Params\":[20,22]}\n\
         foo(1,2)x\n\
         grid()\n\
         logout()\n",
    )
    .await;

    assert_eq!(
        output,
        "0\n\
         3.5\n\
         42\n\
         Parser: syntax error: extra characters after ')'\n\
         ...\n...\n...\n\
         ok\n"
    );
}

#[tokio::test]
async fn test_custom_operations_alongside_builtins() {
    let mut builder = Registry::builder();
    register_builtins(&mut builder, 3);
    builder.register("echo", |a: String, b: String| format!("{a}|{b}"));
    builder.register("both", |a: bool, b: bool| a && b);
    let interpreter = Interpreter::new(Arc::new(builder.build()));

    let output = run_with(
        &interpreter,
        "echo(x,)\necho(x,,)\necho(,y)\nboth(true,false)\nboth(true,yes)\n",
    )
    .await;

    assert_eq!(
        output,
        "Caller: wrong number of arguments: expected 2, got 1\n\
         x|\n\
         |y\n\
         false\n\
         Caller: argument 1 must be bool, got 'yes'\n"
    );
}

#[tokio::test]
async fn test_help_lists_every_operation_once() {
    let interpreter = Interpreter::new(Arc::new(builtin_registry(3)));
    let output = run_with(&interpreter, "help\n").await;

    let registry = interpreter.registry();
    for name in registry.names() {
        let prefix = format!("  {name}(");
        let count = output.lines().filter(|line| line.starts_with(&prefix)).count();
        assert_eq!(count, 1, "operation {name} listed {count} times");
    }
    assert_eq!(output.lines().count(), registry.len() + 1);
}
