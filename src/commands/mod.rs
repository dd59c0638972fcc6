pub type CmdResult<T> = rebrandr::Result<(T, i32)>;

pub(crate) struct GlobalArgs {}

pub mod mappings;
pub mod rebrand;

pub(crate) fn run_json(
    command: crate::Commands,
    global: &GlobalArgs,
) -> (rebrandr::Result<serde_json::Value>, i32) {
    crate::tty::status("rebrandr is working...");

    match command {
        crate::Commands::Run(args) => crate::output::map_cmd_result_to_json(rebrand::run(args, global)),
        crate::Commands::Plan(args) => {
            crate::output::map_cmd_result_to_json(rebrand::plan(args, global))
        }
        crate::Commands::Mappings(args) => {
            crate::output::map_cmd_result_to_json(mappings::run(args, global))
        }
    }
}
