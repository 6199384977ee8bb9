//! 终端模式
//!
//! 启动时保存标准输入的终端属性，中断退出前恢复。
//! 密码输入期间回显被关闭，直接退出会让终端保持无回显状态。

/// 启动时的终端属性
#[derive(Clone, Copy)]
pub struct TerminalMode {
    #[cfg(unix)]
    original: Option<libc::termios>,
}

impl TerminalMode {
    /// 读取当前终端属性；标准输入不是终端时不保存任何内容
    #[cfg(unix)]
    pub fn capture() -> Self {
        let mut attrs = std::mem::MaybeUninit::<libc::termios>::uninit();
        // SAFETY: tcgetattr 只写入 attrs，返回 0 时 attrs 已完整初始化
        let original = unsafe {
            if libc::tcgetattr(libc::STDIN_FILENO, attrs.as_mut_ptr()) == 0 {
                Some(attrs.assume_init())
            } else {
                None
            }
        };
        Self { original }
    }

    #[cfg(not(unix))]
    pub fn capture() -> Self {
        Self {}
    }

    #[cfg(unix)]
    pub fn is_captured(&self) -> bool {
        self.original.is_some()
    }

    #[cfg(not(unix))]
    pub fn is_captured(&self) -> bool {
        false
    }

    /// 恢复启动时的终端属性（包括回显）
    #[cfg(unix)]
    pub fn restore(&self) {
        if let Some(attrs) = &self.original {
            // SAFETY: attrs 来自同一文件描述符上成功的 tcgetattr
            unsafe {
                libc::tcsetattr(libc::STDIN_FILENO, libc::TCSANOW, attrs);
            }
        }
    }

    #[cfg(not(unix))]
    pub fn restore(&self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(unix)]
    fn echo_enabled() -> Option<bool> {
        let mut attrs = std::mem::MaybeUninit::<libc::termios>::uninit();
        unsafe {
            if libc::tcgetattr(libc::STDIN_FILENO, attrs.as_mut_ptr()) != 0 {
                return None;
            }
            Some(attrs.assume_init().c_lflag & libc::ECHO != 0)
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_restore_brings_back_echo() {
        let mode = TerminalMode::capture();
        let Some(echo_before) = echo_enabled() else {
            // 标准输入不是终端（CI），没有可恢复的属性
            assert!(!mode.is_captured());
            mode.restore();
            return;
        };
        assert!(mode.is_captured());

        // 模拟密码输入关闭回显
        unsafe {
            let mut attrs = std::mem::MaybeUninit::<libc::termios>::uninit();
            assert_eq!(libc::tcgetattr(libc::STDIN_FILENO, attrs.as_mut_ptr()), 0);
            let mut attrs = attrs.assume_init();
            attrs.c_lflag &= !libc::ECHO;
            libc::tcsetattr(libc::STDIN_FILENO, libc::TCSANOW, &attrs);
        }
        assert_eq!(echo_enabled(), Some(false));

        mode.restore();
        assert_eq!(echo_enabled(), Some(echo_before));
    }
}
