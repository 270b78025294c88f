use crate::cli::ProxyArgs;
use crate::graph::{ProxyState, serve_proxy};
use crate::style;

use super::{CommandContext, runtime};

pub fn cmd_proxy(args: ProxyArgs, ctx: CommandContext) -> i32 {
    let rt = match runtime() {
        Ok(rt) => rt,
        Err(code) => return code,
    };

    let port = args.port.unwrap_or(ctx.config.port);
    let start_path = start_path(args.user.as_deref());
    let state = ProxyState::new(ctx.fetcher, ctx.config, args.source);

    if let Err(e) = rt.block_on(serve_proxy(state, port, args.open, &start_path)) {
        style::error(&format!("Proxy failed: {}", e));
        return 1;
    }

    0
}

fn start_path(user: Option<&str>) -> String {
    match user {
        Some(user) => format!("/{}", user.trim_matches('/')),
        None => "/".to_string(),
    }
}
