use crate::models::StreakView;

pub fn render_index(view: &StreakView) -> String {
    let disabled = if view.checked_in_today { "disabled" } else { "" };
    // The name is user input, so it goes in last where no later pass can
    // expand placeholders it contains.
    INDEX_HTML
        .replace("{{THEME}}", &view.theme)
        .replace("{{THEME_ICON}}", &view.theme_icon)
        .replace("{{COUNT}}", &view.count.to_string())
        .replace("{{LAST_CHECKED}}", &escape_html(&view.last_checked_label))
        .replace("{{CHECK_IN_LABEL}}", &view.check_in_label)
        .replace("{{CHECK_IN_DISABLED}}", disabled)
        .replace("{{REMIND_TIME}}", view.remind_time.as_deref().unwrap_or(""))
        .replace("{{NAME}}", &escape_html(&view.name))
}

fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en" data-theme="{{THEME}}">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>{{NAME}}</title>
  <style>
    :root {
      --bg: #f7f3ea;
      --ink: #26241f;
      --card: rgba(255, 255, 255, 0.9);
      --accent: #ff6b4a;
      --muted: #6b665c;
      --shadow: 0 24px 60px rgba(47, 72, 88, 0.18);
    }

    [data-theme="dark"] {
      --bg: #15171c;
      --ink: #ecebe7;
      --card: rgba(34, 37, 44, 0.92);
      --accent: #ff8a6b;
      --muted: #a3a09a;
      --shadow: 0 24px 60px rgba(0, 0, 0, 0.45);
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      min-height: 100vh;
      background: var(--bg);
      color: var(--ink);
      font-family: "Trebuchet MS", sans-serif;
      display: grid;
      place-items: center;
      padding: 32px 18px;
    }

    .app {
      width: min(520px, 100%);
      background: var(--card);
      border-radius: 28px;
      box-shadow: var(--shadow);
      padding: 32px;
      display: grid;
      gap: 22px;
      text-align: center;
    }

    header {
      display: flex;
      justify-content: space-between;
      align-items: center;
      gap: 12px;
    }

    h1 {
      margin: 0;
      font-size: 1.6rem;
      cursor: pointer;
    }

    .count {
      font-size: 4.5rem;
      font-weight: 700;
      color: var(--accent);
    }

    .muted {
      color: var(--muted);
    }

    .hidden {
      display: none;
    }

    .actions,
    .reminders,
    #name-editor {
      display: flex;
      gap: 10px;
      justify-content: center;
      flex-wrap: wrap;
    }

    button,
    select,
    input {
      font: inherit;
      border-radius: 999px;
      border: 1px solid var(--muted);
      padding: 10px 18px;
      background: transparent;
      color: inherit;
    }

    button.primary {
      background: var(--accent);
      border-color: var(--accent);
      color: #fff;
    }

    button:disabled {
      opacity: 0.6;
      cursor: default;
    }

    .celebration {
      font-size: 1.3rem;
      font-weight: 600;
    }
  </style>
</head>
<body>
  <main class="app">
    <header>
      <h1 id="name-display" tabindex="0" title="Click to rename">{{NAME}}</h1>
      <form method="post" action="/theme">
        <button id="theme-toggle" type="submit" aria-label="Toggle theme">{{THEME_ICON}}</button>
      </form>
    </header>

    <div id="name-editor" class="hidden">
      <input id="name-input" maxlength="80" />
      <button id="name-save" type="button">Save</button>
    </div>

    <section>
      <div id="streak" class="count">{{COUNT}}</div>
      <div id="last-checked" class="muted">{{LAST_CHECKED}}</div>
    </section>

    <div id="celebration" class="celebration hidden"></div>

    <section class="actions">
      <form id="check-in-form" method="post" action="/checkin">
        <button id="check-in" class="primary" type="submit" {{CHECK_IN_DISABLED}}>{{CHECK_IN_LABEL}}</button>
      </form>
      <form id="reset-form" method="post" action="/reset">
        <button id="reset" type="submit">Reset</button>
      </form>
    </section>

    <div id="status" class="muted"></div>

    <section class="reminders">
      <button id="enable-notifs" type="button">Enable reminders</button>
      <select id="remind-time" data-saved="{{REMIND_TIME}}">
        <option value="">Reminder time…</option>
        <option value="07:00">07:00</option>
        <option value="09:00">09:00</option>
        <option value="12:00">12:00</option>
        <option value="18:00">18:00</option>
        <option value="20:00">20:00</option>
        <option value="22:00">22:00</option>
      </select>
    </section>
    <div id="notif-status" class="muted"></div>
  </main>

  <script>
    const $ = (id) => document.getElementById(id);
    const statusEl = $('status');
    const notifStatusEl = $('notif-status');
    const nameEditor = $('name-editor');
    const nameInput = $('name-input');
    const remindTime = $('remind-time');

    const setStatus = (msg) => { statusEl.textContent = msg || ''; };
    const setNotifStatus = (msg) => { notifStatusEl.textContent = msg || ''; };

    const render = (view) => {
      document.documentElement.dataset.theme = view.theme;
      document.title = view.name;
      $('name-display').textContent = view.name;
      $('theme-toggle').textContent = view.theme_icon;
      $('streak').textContent = String(view.count);
      $('last-checked').textContent = view.last_checked_label;
      $('check-in').disabled = view.checked_in_today;
      $('check-in').textContent = view.check_in_label;
      if (view.remind_time && remindTime.value !== view.remind_time) {
        remindTime.value = view.remind_time;
      }
    };

    const post = async (url, body) => {
      const res = await fetch(url, {
        method: 'POST',
        headers: { 'content-type': 'application/json' },
        body: body === undefined ? undefined : JSON.stringify(body)
      });
      if (!res.ok) {
        const msg = await res.text();
        throw new Error(msg || 'Request failed');
      }
      return res.json();
    };

    const celebrate = (label) => {
      const el = $('celebration');
      el.textContent = label;
      el.classList.remove('hidden');
      setTimeout(() => el.classList.add('hidden'), 4000);
    };

    $('check-in-form').addEventListener('submit', (event) => {
      event.preventDefault();
      post('/api/checkin').then((res) => {
        render(res.view);
        setStatus(res.message);
        if (res.celebration) {
          celebrate(res.celebration);
        }
      }).catch((err) => setStatus(err.message));
    });

    $('reset-form').addEventListener('submit', (event) => {
      event.preventDefault();
      post('/api/reset').then((res) => {
        render(res.view);
        setStatus(res.message);
      }).catch((err) => setStatus(err.message));
    });

    const openNameEditor = () => {
      nameEditor.classList.remove('hidden');
      nameInput.value = $('name-display').textContent.trim();
      nameInput.focus();
      nameInput.select();
    };
    const closeNameEditor = () => nameEditor.classList.add('hidden');
    const saveName = () => {
      post('/api/name', { name: nameInput.value }).then((res) => {
        render(res.view);
        closeNameEditor();
        setStatus(res.message);
      }).catch((err) => setStatus(err.message));
    };

    $('name-display').addEventListener('click', openNameEditor);
    $('name-display').addEventListener('keydown', (e) => {
      if (e.key === 'Enter') openNameEditor();
    });
    $('name-save').addEventListener('click', saveName);
    nameInput.addEventListener('keydown', (e) => {
      if (e.key === 'Enter') saveName();
      if (e.key === 'Escape') closeNameEditor();
    });

    $('enable-notifs').addEventListener('click', () => {
      setNotifStatus('Opening permission prompt…');
      post('/api/reminders/enable')
        .then((res) => setNotifStatus(res.message))
        .catch((err) => setNotifStatus(err.message));
    });

    remindTime.addEventListener('change', (e) => {
      const time = e.target.value;
      if (!time) return;
      setNotifStatus(`Saving time ${time}…`);
      post('/api/reminders/time', { time })
        .then((res) => setNotifStatus(res.message))
        .catch((err) => setNotifStatus(err.message));
    });

    if (remindTime.dataset.saved) {
      remindTime.value = remindTime.dataset.saved;
    }
  </script>
</body>
</html>
"#;
