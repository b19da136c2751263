/// 键盘布局：按键区域、页面、标签与键码表
pub mod layout;

/// 触摸采样与输出按键事件的数据模型
pub mod event_model;

/// 触摸事件追踪与命中测试
pub mod touch;

/// 按下/抬起状态机与输出按键合成
pub mod keyboard;

/// 将键盘面板绘制到像素缓冲区
pub mod render;

/// 帧缓冲、触摸输入设备与 uinput 虚拟键盘
pub mod devices;

/// 主循环：绘制 → 读取触摸 → 处理 → 输出
pub mod frame_loop;

/// 启动配置 (TOML)
pub mod config;

/// 命令行参数
pub mod cli;

#[cfg(test)]
mod testing;

// 整个守护进程是单线程的，唯一会阻塞的地方是 `TouchTracker::next_sample`
// 每一轮都先把上一轮结束时的状态画出来，再去等下一批触摸事件

// 只追踪一个触点：type B 设备锁定第一个报告 tracking id 的 slot，
// type A 设备只取每批里的第一条触点记录

// HACK: 帧缓冲直接按 32bpp XRGB 写，其他像素格式在启动时直接报错
