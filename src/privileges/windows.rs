/// Check if the process is running as administrator
pub fn is_admin() -> bool {
    use winapi::um::shellapi::IsUserAnAdmin;
    // SAFETY: IsUserAnAdmin takes no arguments and only inspects the
    // calling thread's token
    unsafe { IsUserAnAdmin() != 0 }
}
