// 控制台输出模块
// 通过注册的串口后端输出，故障路径和普通日志共用

use core::fmt;
use spin::Once;

/// Byte sink behind the console, usually a UART or the SBI console.
///
/// Implementations must work from a trap handler: no allocation, no locks
/// that normal code could be holding, no interrupts needed to drain.
pub trait SerialPort: Sync {
    fn write_str(&self, s: &str);
}

/// 全局串口，只能设置一次
static PORT: Once<&'static dyn SerialPort> = Once::new();

/// 设置控制台后端，返回是否设置成功
pub fn set_port(port: &'static dyn SerialPort) -> bool {
    let mut installed = false;
    PORT.call_once(|| {
        installed = true;
        port
    });
    installed
}

fn port() -> Option<&'static dyn SerialPort> {
    PORT.get().copied().or_else(default_port)
}

#[cfg(target_arch = "riscv32")]
fn default_port() -> Option<&'static dyn SerialPort> {
    Some(&crate::platform::sbi::SBI_CONSOLE)
}

#[cfg(not(target_arch = "riscv32"))]
fn default_port() -> Option<&'static dyn SerialPort> {
    None
}

/// 格式化输出函数
pub fn print(args: fmt::Arguments) {
    use core::fmt::Write;
    let _ = Stdout.write_fmt(args);
}

/// 直接输出字符串
pub fn print_str(s: &str) {
    if let Some(port) = port() {
        port.write_str(s);
    }
}

/// 标准输出结构体，没有后端时静默丢弃
pub struct Stdout;

impl fmt::Write for Stdout {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        print_str(s);
        Ok(())
    }
}

/// `fmt::Write` adapter over one specific port, bypassing the global one.
pub struct PortWriter<'a> {
    port: &'a dyn SerialPort,
}

impl<'a> PortWriter<'a> {
    pub fn new(port: &'a dyn SerialPort) -> Self {
        Self { port }
    }
}

impl fmt::Write for PortWriter<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.port.write_str(s);
        Ok(())
    }
}

/// print宏 - 格式化输出
#[macro_export]
macro_rules! print {
    ($($arg:tt)*) => {
        $crate::console::print(format_args!($($arg)*))
    };
}

/// println宏 - 格式化输出并换行
#[macro_export]
macro_rules! println {
    () => {
        $crate::print!("\n")
    };
    ($($arg:tt)*) => {
        $crate::print!("{}\n", format_args!($($arg)*))
    };
}

/// 调试输出宏 - 带有文件和行号信息
#[macro_export]
macro_rules! debug_print {
    ($($arg:tt)*) => {{
        $crate::print!("[{}:{}] ", file!(), line!());
        $crate::println!($($arg)*);
    }};
}

/// 错误输出宏 - 红色高亮显示
#[macro_export]
macro_rules! error_print {
    ($($arg:tt)*) => {{
        $crate::print!("\x1b[31m[ERROR] ");
        $crate::print!($($arg)*);
        $crate::print!("\x1b[0m\n");
    }};
}

/// 警告输出宏 - 黄色高亮显示
#[macro_export]
macro_rules! warn_print {
    ($($arg:tt)*) => {{
        $crate::print!("\x1b[33m[WARN] ");
        $crate::print!($($arg)*);
        $crate::print!("\x1b[0m\n");
    }};
}

/// 信息输出宏 - 绿色高亮显示
#[macro_export]
macro_rules! info_print {
    ($($arg:tt)*) => {{
        $crate::print!("\x1b[32m[INFO] ");
        $crate::print!($($arg)*);
        $crate::print!("\x1b[0m\n");
    }};
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::string::String;

    struct CapturePort {
        text: spin::Mutex<String>,
    }

    impl SerialPort for CapturePort {
        fn write_str(&self, s: &str) {
            self.text.lock().push_str(s);
        }
    }

    #[test]
    fn port_writer_forwards_formatted_text() {
        use core::fmt::Write;
        let port = CapturePort { text: spin::Mutex::new(String::new()) };
        let mut out = PortWriter::new(&port);
        write!(out, "pc=0x{:08x}", 0x4000_1000u32).unwrap();
        assert_eq!(port.text.lock().as_str(), "pc=0x40001000");
    }

    #[test]
    fn leveled_macros_reach_the_registered_port() {
        static GLOBAL: CapturePort = CapturePort { text: spin::Mutex::new(String::new()) };
        assert!(set_port(&GLOBAL));
        assert!(!set_port(&GLOBAL));

        crate::warn_print!("watchdog {}", "off");
        let text = GLOBAL.text.lock().clone();
        assert!(text.contains("[WARN] watchdog off"));
    }
}
