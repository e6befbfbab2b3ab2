#[cfg(test)]
#[path = "slash_commands_test.rs"]
mod tests;

pub struct SlashCommand {
    command: String,
    pub args: Vec<String>,
}

impl SlashCommand {
    pub fn parse(text: &str) -> Option<SlashCommand> {
        let mut args = text
            .trim()
            .split(' ')
            .map(|e| return e.to_string())
            .collect::<Vec<String>>();
        let prefix = args[0].to_string();
        args.remove(0);

        let cmd = SlashCommand {
            command: prefix,
            args,
        };
        if cmd.is_quit()
            || cmd.is_help()
            || cmd.is_show_settings()
            || cmd.is_set()
            || cmd.is_attach()
            || cmd.is_detach()
            || cmd.is_clear()
        {
            return Some(cmd);
        }

        return None;
    }

    /// Everything after the first `skip` arguments, with inner spacing kept.
    pub fn rest(&self, skip: usize) -> String {
        if self.args.len() <= skip {
            return "".to_string();
        }

        return self.args[skip..].join(" ");
    }

    pub fn is_quit(&self) -> bool {
        return ["/q", "/quit", "/exit"].contains(&self.command.as_str());
    }

    pub fn is_help(&self) -> bool {
        return ["/h", "/help"].contains(&self.command.as_str());
    }

    pub fn is_show_settings(&self) -> bool {
        return ["/s", "/settings"].contains(&self.command.as_str());
    }

    pub fn is_set(&self) -> bool {
        return self.command == "/set";
    }

    pub fn is_attach(&self) -> bool {
        return ["/a", "/attach"].contains(&self.command.as_str());
    }

    pub fn is_detach(&self) -> bool {
        return ["/d", "/detach"].contains(&self.command.as_str());
    }

    pub fn is_clear(&self) -> bool {
        return self.command == "/clear";
    }
}
