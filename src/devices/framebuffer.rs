use std::fs::File;
use std::io;
use std::os::unix::fs::FileExt;
use std::os::unix::io::AsRawFd;
use std::path::Path;

use anyhow::{Context, Result, bail};

use crate::layout::PanelGeometry;
use crate::render::PanelDisplay;

const FBIOGET_VSCREENINFO: libc::c_ulong = 0x4600;
const FBIOGET_FSCREENINFO: libc::c_ulong = 0x4602;

#[allow(dead_code)]
#[repr(C)]
#[derive(Debug, Default, Clone, Copy)]
struct FbBitfield {
    offset: u32,
    length: u32,
    msb_right: u32,
}

/// `struct fb_var_screeninfo` from `<linux/fb.h>`.
#[allow(dead_code)]
#[repr(C)]
#[derive(Debug, Default, Clone, Copy)]
struct VarScreenInfo {
    xres: u32,
    yres: u32,
    xres_virtual: u32,
    yres_virtual: u32,
    xoffset: u32,
    yoffset: u32,
    bits_per_pixel: u32,
    grayscale: u32,
    red: FbBitfield,
    green: FbBitfield,
    blue: FbBitfield,
    transp: FbBitfield,
    nonstd: u32,
    activate: u32,
    height: u32,
    width: u32,
    accel_flags: u32,
    pixclock: u32,
    left_margin: u32,
    right_margin: u32,
    upper_margin: u32,
    lower_margin: u32,
    hsync_len: u32,
    vsync_len: u32,
    sync: u32,
    vmode: u32,
    rotate: u32,
    colorspace: u32,
    reserved: [u32; 4],
}

/// `struct fb_fix_screeninfo` from `<linux/fb.h>`.
#[allow(dead_code)]
#[repr(C)]
#[derive(Debug, Default, Clone, Copy)]
struct FixScreenInfo {
    id: [u8; 16],
    smem_start: libc::c_ulong,
    smem_len: u32,
    kind: u32,
    type_aux: u32,
    visual: u32,
    xpanstep: u16,
    ypanstep: u16,
    ywrapstep: u16,
    line_length: u32,
    mmio_start: libc::c_ulong,
    mmio_len: u32,
    accel: u32,
    capabilities: u16,
    reserved: [u16; 2],
}

fn screen_info<T>(file: &File, request: libc::c_ulong, info: &mut T) -> io::Result<()> {
    // SAFETY: `T` mirrors the kernel struct filled by `request` and outlives the call.
    let ret = unsafe { libc::ioctl(file.as_raw_fd(), request as _, info as *mut T) };
    if ret == -1 {
        return Err(io::Error::last_os_error());
    }
    Ok(())
}

/// A linear framebuffer device node.
///
/// Only the panel strip at the bottom of the screen is ever written.
#[derive(Debug)]
pub struct Framebuffer {
    file: File,
    var: VarScreenInfo,
    fix: FixScreenInfo,
    strip_offset: u64,
}

impl Framebuffer {
    pub fn open(path: &Path) -> Result<Self> {
        let mut options = std::fs::OpenOptions::new();
        options.read(true);
        options.write(true);
        let file = options
            .open(path)
            .with_context(|| format!("opening framebuffer device {}", path.display()))?;

        let mut var = VarScreenInfo::default();
        let mut fix = FixScreenInfo::default();
        screen_info(&file, FBIOGET_FSCREENINFO, &mut fix)
            .context("reading fixed framebuffer information")?;
        screen_info(&file, FBIOGET_VSCREENINFO, &mut var)
            .context("reading variable framebuffer information")?;
        if var.bits_per_pixel != 32 {
            bail!(
                "{}: {} bits per pixel is not supported, need 32",
                path.display(),
                var.bits_per_pixel
            );
        }
        tracing::info!(
            framebuffer = %path.display(),
            xres = var.xres,
            yres = var.yres,
            line_length = fix.line_length,
            "framebuffer opened"
        );
        Ok(Self {
            file,
            var,
            fix,
            strip_offset: 0,
        })
    }

    pub fn xres(&self) -> u32 {
        self.var.xres
    }

    pub fn yres(&self) -> u32 {
        self.var.yres
    }

    /// Bytes per screen row.
    pub fn line_length(&self) -> usize {
        self.fix.line_length as usize
    }

    /// Points flushes at the panel's rows.
    pub fn place(&mut self, geometry: &PanelGeometry) {
        self.strip_offset = self.fix.line_length as u64 * u64::from(geometry.top());
    }
}

impl PanelDisplay for Framebuffer {
    fn flush(&mut self, strip: &[u8]) -> io::Result<()> {
        self.file.write_all_at(strip, self.strip_offset)
    }
}
