//! Shared fixtures: saved reference pages and on-disk mirrors.
#![allow(dead_code)]

use std::fs;

use tempfile::TempDir;

/// An Android-layout page for `com.example.billing.Client.Builder`.
pub const ANDROID_BUILDER_PAGE: &str = r#"<!DOCTYPE html>
<html><body>
<code class="api-signature">public
static

abstract
class
</code>
<h1>Client.Builder</h1>
<code class="api-signature">extends <a href="/reference/java/lang/Object.html">Object</a></code>
<code class="api-signature">implements <a href="/reference/java/io/Closeable.html">Closeable</a>, <a href="/reference/com/example/billing/Listener.html">Listener</a>&lt;<a href="/reference/java/lang/String.html">String</a>&gt;</code>
<div id="jd-content">
<!-- Constants -->
<div>
<pre class="api-signature">public static final int TIMEOUT</pre>
<div class="jd-tagdescr"><p>Default   timeout in
milliseconds.</p></div>
<p>Constant Value: 5000 (0x00001388)</p>
</div>
<div>
<pre class="api-signature">public static final String TAG</pre>
<p>Constant Value: "billing"</p>
</div>
<!-- Public ctors -->
<div>
<pre class="api-signature">public Builder ()</pre>
</div>
<!-- Public methdos -->
<div>
<pre class="api-signature">public <a href="/reference/com/example/billing/Task.html">Task</a>&lt;<a href="/reference/java/lang/Void.html">Void</a>&gt; connect (<a href="/reference/android/content/Context.html">Context</a> context, int retries)</pre>
<div class="jd-tagdescr"><p>Connects using <code><a href="/reference/android/content/Context.html">Context</a></code>.</p><p>See <a href="https://example.com/guide">the guide</a>.</p></div>
</div>
<div>
<pre class="api-signature">public abstract void close ()</pre>
</div>
</div>
</body></html>
"#;

/// An Android-layout page for `com.example.billing.Client`.
pub const ANDROID_CLIENT_PAGE: &str = r#"<!DOCTYPE html>
<html><body>
<code class="api-signature">public


abstract
class
</code>
<div id="jd-content">
<!-- Public methdos -->
<div>
<pre class="api-signature">public abstract boolean isReady ()</pre>
</div>
</div>
</body></html>
"#;

/// An Android-layout class index listing the two pages above and a missing third.
pub const ANDROID_INDEX_PAGE: &str = r#"<!DOCTYPE html>
<html><body><table>
<tr><td class="jd-linkcol"><a href="/reference/com/example/billing/Client.html">Client</a></td></tr>
<tr><td class="jd-linkcol"><a href="/reference/com/example/billing/Client.Builder.html">Client.Builder</a></td></tr>
<tr><td class="jd-linkcol"><a href="/reference/com/example/billing/Gone.html">Gone</a></td></tr>
</table></body></html>
"#;

/// A Google-layout page for `com.google.android.gms.auth.AuthClient`.
pub const GOOGLE_CLIENT_PAGE: &str = r#"<!DOCTYPE html>
<html><body>
<div id="jd-header">
public interface
<h1>AuthClient</h1>
<br>
implements <a href="/android/reference/com/google/android/gms/common/api/HasApiKey.html">HasApiKey</a>&lt;<a href="/android/reference/com/google/android/gms/auth/AuthOptions.html">AuthOptions</a>&gt;
</div>
<section id="constants">
<div class="jd-details">
<h3 class="jd-details-title"><span class="normal">public static final String</span> <strong>EXTRA_ACCOUNT</strong></h3>
<p>Key for the account extra.</p>
<div class="jd-tagdata"><span class="jd-tagdescr">Constant Value:</span> <span>"account"</span></div>
</div>
</section>
<section id="public-methods">
<div class="jd-details">
<h3 class="jd-details-title"><span class="normal">public abstract <a href="/android/reference/com/google/android/gms/tasks/Task.html">Task</a>&lt;<a href="/android/reference/java/util/List.html">List</a>&lt;<a href="/android/reference/java/lang/String.html">String</a>&gt;&gt;</span> <strong>listAccounts</strong> (<a href="/android/reference/java/lang/String.html">String</a> type, boolean visible)</h3>
<p>Lists accounts of the given <code>type</code>.</p>
</div>
</section>
</body></html>
"#;

/// Write `pages` (site path, contents) under a fresh temporary directory.
pub fn mirror(pages: &[(&str, &str)]) -> TempDir {
	let dir = tempfile::tempdir().expect("create mirror directory");
	for (path, contents) in pages {
		let file = dir.path().join(path.trim_start_matches('/'));
		if let Some(parent) = file.parent() {
			fs::create_dir_all(parent).expect("create page directory");
		}
		fs::write(&file, contents).expect("write page");
	}
	dir
}
