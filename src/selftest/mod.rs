// 自检模块入口
// 在目标板上运行，验证帧捕获、寄存器恢复和报告格式


use crate::config::TargetConfig;
use crate::console::SerialPort;
use crate::fault::{CpuControl, ExceptionCause, ExtraRegisters, FaultHandler, TrapInstaller, Watchdog};
use crate::{error_print, info_print, println, warn_print};

/// 测试结果枚举
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TestResult {
    Pass,
    Fail,
    Skip,
}

/// 测试用例结构体
pub struct TestCase {
    pub name: &'static str,
    pub func: fn() -> TestResult,
    pub description: &'static str,
}

/// 测试统计
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TestSummary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub skipped: usize,
}

/// 测试运行器
pub struct TestRunner {
    summary: TestSummary,
}

impl TestRunner {
    /// 创建新的测试运行器
    pub fn new() -> Self {
        Self {
            summary: TestSummary::default(),
        }
    }

    /// 运行单个测试用例
    pub fn run_test(&mut self, test: &TestCase) {
        self.summary.total += 1;

        println!("Running test: {} - {}", test.name, test.description);

        match (test.func)() {
            TestResult::Pass => {
                self.summary.passed += 1;
                info_print!("  [PASS] {}", test.name);
            }
            TestResult::Fail => {
                self.summary.failed += 1;
                error_print!("  [FAIL] {}", test.name);
            }
            TestResult::Skip => {
                self.summary.skipped += 1;
                warn_print!("  [SKIP] {}", test.name);
            }
        }
    }

    /// 运行测试套件
    pub fn run_suite(&mut self, suite_name: &str, tests: &[TestCase]) {
        println!("=== {} Test Suite ===", suite_name);
        for test in tests {
            self.run_test(test);
        }
        println!("=== {} Test Suite Complete ===", suite_name);
    }

    /// 打印测试总结
    pub fn print_summary(&self) {
        let s = &self.summary;
        println!("=== Test Summary ===");
        println!("Total tests: {}", s.total);
        info_print!("Passed: {}", s.passed);
        if s.failed > 0 {
            error_print!("Failed: {}", s.failed);
        }
        if s.skipped > 0 {
            warn_print!("Skipped: {}", s.skipped);
        }
        println!("==================");
    }

    pub fn summary(&self) -> TestSummary {
        self.summary
    }

    /// 获取是否所有测试都通过
    pub fn all_passed(&self) -> bool {
        self.summary.failed == 0 && self.summary.total > 0
    }
}

impl Default for TestRunner {
    fn default() -> Self {
        Self::new()
    }
}

/// 运行所有自检
///
/// Safe to call at boot before or after the fault handler is installed; the
/// checks use their own board stub and never touch the global fault system.
pub fn run_all_tests() -> TestSummary {
    let mut runner = TestRunner::new();

    frame_test::run_frame_tests(&mut runner);
    report_test::run_report_tests(&mut runner);

    runner.print_summary();
    if runner.all_passed() {
        info_print!("Fault handler self test passed");
    } else {
        warn_print!("Fault handler self test reported failures");
    }
    runner.summary()
}

/// Extra registers the stub board hands out, distinct per field.
pub(crate) const STUB_EXTRA: ExtraRegisters = ExtraRegisters {
    litbase: 0x5EF7_0001,
    sr176: 0x5EF7_0002,
    sr208: 0x5EF7_0003,
    reason: ExceptionCause::DivideByZero as u32,
    excvaddr: 0,
};

/// 自检用的空板卡：不安装、不输出
pub(crate) struct StubBoard;

impl TrapInstaller for StubBoard {
    fn register(&self, _cause: ExceptionCause, _handler: FaultHandler) {}
}

impl Watchdog for StubBoard {
    fn disable(&self) {}
    fn enable(&self) {}
}

impl CpuControl for StubBoard {
    fn save_extra_registers(&self) -> ExtraRegisters {
        STUB_EXTRA
    }

    fn halt(&self) -> ! {
        crate::fault::halt_forever()
    }
}

impl SerialPort for StubBoard {
    fn write_str(&self, _s: &str) {}
}

/// Config whose RAM covers the whole 32-bit space; the checks only ever read
/// their own buffers.
pub(crate) fn stub_config(sp_offset: u32) -> TargetConfig {
    TargetConfig::new("selftest", crate::config::MemoryRegion::new(0, u32::MAX), u32::MAX, sp_offset)
}
