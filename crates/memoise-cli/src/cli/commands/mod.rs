use super::args::*;

pub mod call;
pub mod demo;

pub fn dispatch(cli: Cli) -> anyhow::Result<i32> {
    match cli.cmd {
        Command::Demo(args) => demo::cmd_demo(args),
        Command::Call(args) => call::cmd_call(args),
    }
}
